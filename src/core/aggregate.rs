//! Composite validation error
//!
//! [`AggregateValidationError`] collects every field-level failure of a parse
//! so callers can report them all at once. Adding one aggregate into another
//! flattens it: the receiving aggregate only ever holds a flat, ordered list
//! of [`FieldError`] entries.

use crate::core::error::InvalidArgumentError;
use crate::core::translate::{DefaultTranslator, Translator};
use crate::core::validation::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Machine-readable category of a field failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A required field was null or empty
    Required,
    /// The filter rejected the value's type or shape
    TypeMismatch,
    /// The validator rejected the filtered value
    ValidationFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Required => "REQUIRED",
            ErrorCode::TypeMismatch => "TYPE_MISMATCH",
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
        }
    }

    /// Translation key used when a message does not name its own
    pub fn default_key(&self) -> &'static str {
        match self {
            ErrorCode::Required => "required",
            ErrorCode::TypeMismatch => "type_mismatch",
            ErrorCode::ValidationFailed => "validation_failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An untranslated error message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Message {
    pub code: ErrorCode,
    /// Translation key; empty means [`ErrorCode::default_key`]
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl Message {
    pub fn new(code: ErrorCode, key: impl Into<String>) -> Self {
        Self {
            code,
            key: key.into(),
            params: Map::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn required() -> Self {
        Self::new(ErrorCode::Required, ErrorCode::Required.default_key())
    }

    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(ErrorCode::TypeMismatch, ErrorCode::TypeMismatch.default_key())
            .with_param("expected", expected.into())
            .with_param("actual", actual.into())
    }

    /// Wrap a validator failure, keeping its rule code as translation key
    pub fn validation_failed(error: ValidationError) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            key: error.code,
            params: error.params,
        }
    }

    fn normalized(mut self) -> Self {
        if self.key.is_empty() {
            self.key = self.code.default_key().to_string();
        }
        self
    }
}

/// One flattened entry of an aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// Field the failure refers to, if any
    #[serde(rename = "field")]
    pub reference: Option<String>,
    pub code: ErrorCode,
    pub key: String,
    /// Final display string produced by the translator
    pub message: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
}

/// Anything that can be added to an aggregate
#[derive(Debug)]
pub enum ErrorSource {
    Message(Message),
    Messages(Vec<Message>),
    Aggregate(AggregateValidationError),
}

impl From<Message> for ErrorSource {
    fn from(message: Message) -> Self {
        ErrorSource::Message(message)
    }
}

impl From<Vec<Message>> for ErrorSource {
    fn from(messages: Vec<Message>) -> Self {
        ErrorSource::Messages(messages)
    }
}

impl From<AggregateValidationError> for ErrorSource {
    fn from(aggregate: AggregateValidationError) -> Self {
        ErrorSource::Aggregate(aggregate)
    }
}

/// Ordered collection of field failures, raised as a single error
#[derive(Clone)]
pub struct AggregateValidationError {
    entries: Vec<FieldError>,
    constituents: Vec<AggregateValidationError>,
    translator: Arc<dyn Translator>,
}

impl AggregateValidationError {
    /// Create an empty aggregate using the [`DefaultTranslator`]
    pub fn new() -> Self {
        Self::with_translator(Arc::new(DefaultTranslator::new()))
    }

    pub fn with_translator(translator: Arc<dyn Translator>) -> Self {
        Self {
            entries: Vec::new(),
            constituents: Vec::new(),
            translator,
        }
    }

    /// Add a message, a list of messages, or another aggregate
    ///
    /// Aggregates are flattened: each of their entries is appended in order,
    /// taking `reference` when one is given and keeping its own otherwise.
    pub fn add_error(
        &mut self,
        error: impl Into<ErrorSource>,
        reference: Option<&str>,
    ) -> &mut Self {
        match error.into() {
            ErrorSource::Message(message) => self.push_message(message, reference),
            ErrorSource::Messages(messages) => {
                for message in messages {
                    self.push_message(message, reference);
                }
            }
            ErrorSource::Aggregate(aggregate) => {
                for entry in &aggregate.entries {
                    let mut entry = entry.clone();
                    if let Some(reference) = reference {
                        entry.reference = Some(reference.to_string());
                    }
                    self.entries.push(entry);
                }
                self.constituents.push(aggregate);
            }
        }
        self
    }

    /// Add message(s) supplied as JSON
    ///
    /// Accepts one message object or an array of them. If any item is not a
    /// message, nothing is added.
    pub fn add_error_value(
        &mut self,
        value: &Value,
        reference: Option<&str>,
    ) -> Result<&mut Self, InvalidArgumentError> {
        let messages = match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| parse_message(item, Some(index)))
                .collect::<Result<Vec<_>, _>>()?,
            other => vec![parse_message(other, None)?],
        };
        Ok(self.add_error(messages, reference))
    }

    fn push_message(&mut self, message: Message, reference: Option<&str>) {
        let message = message.normalized();
        let text = self.translator.translate(&message);
        self.entries.push(FieldError {
            reference: reference.map(str::to_string),
            code: message.code,
            key: message.key,
            message: text,
            params: message.params,
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattened entries in insertion order
    pub fn entries(&self) -> &[FieldError] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<FieldError> {
        self.entries
    }

    /// Aggregates that were flattened into this one
    pub fn constituents(&self) -> &[AggregateValidationError] {
        &self.constituents
    }

    /// Entries referring to the given field
    pub fn errors_for<'a>(&'a self, reference: &'a str) -> impl Iterator<Item = &'a FieldError> {
        self.entries
            .iter()
            .filter(move |e| e.reference.as_deref() == Some(reference))
    }

    /// Distinct references, in first-seen order
    pub fn references(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for reference in self.entries.iter().filter_map(|e| e.reference.as_deref()) {
            if !seen.contains(&reference) {
                seen.push(reference);
            }
        }
        seen
    }
}

fn parse_message(value: &Value, index: Option<usize>) -> Result<Message, InvalidArgumentError> {
    serde_json::from_value::<Message>(value.clone()).map_err(|e| InvalidArgumentError {
        index,
        reason: e.to_string(),
    })
}

impl Default for AggregateValidationError {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AggregateValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateValidationError")
            .field("entries", &self.entries)
            .field("constituents", &self.constituents.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for AggregateValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msgs: Vec<String> = self
            .entries
            .iter()
            .map(|e| match &e.reference {
                Some(reference) => format!("{}: {}", reference, e.message),
                None => e.message.clone(),
            })
            .collect();
        write!(f, "Validation errors: {}", msgs.join(", "))
    }
}

impl std::error::Error for AggregateValidationError {}

impl Serialize for AggregateValidationError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr<'a> {
            errors: &'a [FieldError],
        }

        Repr {
            errors: &self.entries,
        }
        .serialize(serializer)
    }
}
