//! Integration tests for YAML-driven field definitions

use inputset::prelude::*;
use serde_json::json;
use std::io::Write;

const SIGNUP: &str = r#"
name: signup
fields:
  email: [true, [trim, lowercase], email]
  username:
    required: true
    filter: trim
    validator:
      - {type: string_length, min: 3, max: 20}
      - {type: pattern, regex: "^[a-z0-9_]+$"}
  age:
    filter: integer
    validator: {type: min_value, min: 18}
  newsletter: [false, boolean]
  referrer: false
"#;

#[test]
fn test_build_from_yaml_and_parse() {
    let config = InputConfig::from_yaml_str(SIGNUP).unwrap();
    let mut form = InputSet::from_config(&config).unwrap();

    form.parse([
        ("email", json!("  Jane@Example.COM ")),
        ("username", json!("jane_doe")),
        ("age", json!("34")),
        ("newsletter", json!("on")),
    ])
    .unwrap();

    assert_eq!(form.get("email").unwrap(), &json!("jane@example.com"));
    assert_eq!(form.get("age").unwrap(), &json!(34));
    assert_eq!(form.get("newsletter").unwrap(), &json!(true));
    assert_eq!(form.get("referrer").unwrap(), &Value::Null);
    assert_eq!(
        form.field_names().collect::<Vec<_>>(),
        vec!["email", "username", "age", "newsletter", "referrer"]
    );
}

#[test]
fn test_yaml_form_reports_all_failures() {
    let config = InputConfig::from_yaml_str(SIGNUP).unwrap();
    let mut form = InputSet::from_config(&config).unwrap();

    let err = form
        .parse([
            ("email", json!("")),
            ("username", json!("J!")),
            ("age", json!("seventeen")),
            ("newsletter", json!("perhaps")),
        ])
        .unwrap_err();

    assert_eq!(
        err.references(),
        vec!["email", "username", "age", "newsletter"]
    );
    assert_eq!(err.errors_for("username").next().unwrap().key, "string_too_short");
}

#[test]
fn test_malformed_field_names_offender() {
    let yaml = r#"
fields:
  email: [true, trim, email]
  age: [false, integer, {type: string_length, min: 9, max: 1}]
"#;
    let config = InputConfig::from_yaml_str(yaml).unwrap();
    let err = InputSet::from_config(&config).unwrap_err();

    assert_eq!(err.field, "age");
    assert!(matches!(err.cause, DefinitionCause::Parameter(_)));
}

#[test]
fn test_load_config_is_all_or_nothing() {
    let yaml = "fields:\n  a: true\n  b: [1, 2, 3, 4]\n";
    let config = InputConfig::from_yaml_str(yaml).unwrap();
    let mut form = InputSet::empty();

    let err = form.load_config(&config).unwrap_err();

    assert_eq!(err.field, "b");
    assert!(matches!(err.cause, DefinitionCause::Arity(4)));
    assert_eq!(form.field_names().count(), 0);
}

#[test]
fn test_load_config_uses_set_defaults() {
    let config = InputConfig::from_yaml_str("fields:\n  code: true\n").unwrap();
    let mut form = InputSet::empty().with_defaults(FieldDefaults {
        filter: std::sync::Arc::new(filters::uppercase()),
        validator: std::sync::Arc::new(validators::noop()),
    });
    form.load_config(&config).unwrap();

    form.parse([("code", json!("eur"))]).unwrap();
    assert_eq!(form.get("code").unwrap(), &json!("EUR"));
}

#[test]
fn test_add_definition_spec() {
    let mut form = InputSet::empty();
    form.add_definition_spec("price", &json!({"filter": {"type": "round_decimals", "decimals": 2}}))
        .unwrap();
    form.parse([("price", json!(9.999))]).unwrap();
    assert_eq!(form.get("price").unwrap(), &json!(10.0));

    let err = form
        .add_definition_spec("qty", &json!([null]))
        .unwrap_err();
    assert_eq!(err.field, "qty");
    assert!(matches!(err.cause, DefinitionCause::RequiredType(_)));
    assert!(form.definition("qty").is_none());
}

#[test]
fn test_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SIGNUP.as_bytes()).unwrap();

    let config = InputConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.name.as_deref(), Some("signup"));
    assert_eq!(config.fields.len(), 5);
}

#[test]
fn test_from_yaml_file_missing() {
    let err = InputConfig::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn test_from_yaml_file_parse_error_names_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"fields: [unterminated").unwrap();

    let err = InputConfig::from_yaml_file(file.path()).unwrap_err();
    match err {
        ConfigError::ParseError { file: Some(name), .. } => {
            assert_eq!(name, file.path().display().to_string())
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_merged_configs_build_one_form() {
    let base = InputConfig::from_yaml_str("fields:\n  email: [true, trim]\n  age: false\n").unwrap();
    let strict =
        InputConfig::from_yaml_str("fields:\n  age: [true, integer]\n  terms: [true, boolean]\n")
            .unwrap();

    let mut form = InputSet::from_config(&InputConfig::merge(vec![base, strict])).unwrap();
    let err = form.parse([("email", json!("a@b.com"))]).unwrap_err();

    assert_eq!(err.references(), vec!["age", "terms"]);
}
