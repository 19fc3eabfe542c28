//! Message translation
//!
//! The aggregate error stores final display strings. Turning a [`Message`]
//! (code + key + params) into such a string is delegated to a [`Translator`],
//! so locale and wording stay out of the validation pipeline.

use crate::core::aggregate::Message;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Renders a message into its final display string
pub trait Translator: Send + Sync {
    fn translate(&self, message: &Message) -> String;
}

/// English templates with `{param}` placeholders
///
/// Unknown keys render as `Invalid value ({key})`. Placeholders without a
/// matching param are left as-is.
#[derive(Debug, Clone)]
pub struct DefaultTranslator {
    templates: HashMap<String, String>,
}

impl DefaultTranslator {
    pub fn new() -> Self {
        let templates = [
            ("required", "This field is required"),
            ("type_mismatch", "Expected {expected}, got {actual}"),
            ("not_positive", "Must be positive (got {value})"),
            ("string_too_short", "Must be at least {min} characters long"),
            ("string_too_long", "Must be at most {max} characters long"),
            ("value_too_small", "Must be at least {min}"),
            ("value_too_large", "Must not exceed {max}"),
            ("not_in_list", "Must be one of: {allowed}"),
            ("invalid_date_format", "Must be a date in the format {format}"),
            ("invalid_email", "Must be a valid email address"),
            ("invalid_url", "Must be a valid URL"),
            ("pattern_mismatch", "Must match the pattern {pattern}"),
        ]
        .into_iter()
        .map(|(key, template)| (key.to_string(), template.to_string()))
        .collect();

        Self { templates }
    }

    /// Override or add the template for a key
    pub fn with_template(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(key.into(), template.into());
        self
    }

    fn render(template: &str, message: &Message) -> String {
        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let regex = PLACEHOLDER.get_or_init(|| Regex::new(r"\{(\w+)\}").unwrap());

        regex
            .replace_all(template, |caps: &Captures<'_>| {
                match message.params.get(&caps[1]) {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

impl Default for DefaultTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for DefaultTranslator {
    fn translate(&self, message: &Message) -> String {
        match self.templates.get(&message.key) {
            Some(template) => Self::render(template, message),
            None => format!("Invalid value ({})", message.key),
        }
    }
}
