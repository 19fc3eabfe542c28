//! Signup form driven by a YAML definition
//!
//! Run with `RUST_LOG=inputset=trace` to see the pipeline decisions.

use anyhow::Result;
use inputset::prelude::*;
use serde::Deserialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

const SIGNUP: &str = r#"
name: signup
fields:
  email: [true, [trim, lowercase], email]
  username:
    required: true
    filter: trim
    validator: [{type: string_length, min: 3, max: 20}, {type: pattern, regex: "^[a-z0-9_]+$"}]
  age:
    filter: integer
    validator: {type: min_value, min: 18}
  newsletter: [false, boolean]
"#;

#[derive(Debug, Deserialize)]
struct Signup {
    email: String,
    username: String,
    age: Option<i64>,
    newsletter: Option<bool>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = InputConfig::from_yaml_str(SIGNUP)?;
    let mut form = InputSet::from_config(&config)?;

    println!("First submission:");
    let submission = json!({
        "email": "",
        "username": "X",
        "age": "sixteen",
        "newsletter": "yes",
        "utm_source": "mail"
    });
    if let Err(errors) = form.parse(submission.as_object().cloned().unwrap_or_default()) {
        for entry in errors.entries() {
            println!(
                "  {:<10} {:<18} {}",
                entry.reference.as_deref().unwrap_or("-"),
                entry.code,
                entry.message
            );
        }
    }

    println!("\nFixing fields one at a time:");
    for (name, value) in [
        ("email", json!(" Jane@Example.com ")),
        ("username", json!("jane_doe")),
        ("age", json!("34")),
    ] {
        match form.add_value(name, value) {
            Ok(_) => println!("  {} accepted, form is valid", name),
            Err(errors) => println!("  {} updated, {} error(s) left", name, errors.len()),
        }
    }

    let signup: Signup = form.deserialize()?;
    println!("\n{:#?}", signup);
    println!("Submitted but undefined: {}", form.get_raw("utm_source")?);
    println!("Non-empty values: {:?}", form.to_map(true));

    Ok(())
}
