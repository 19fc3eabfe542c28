//! Typed error handling
//!
//! Per-field input problems never surface here directly: they are batched into
//! an [`AggregateValidationError`]. The types in this module cover the
//! programmer and integration mistakes that propagate immediately.
//!
//! # Error Categories
//!
//! - [`DefinitionError`]: a field definition is structurally malformed
//! - [`UnknownFieldError`]: an accessor was called with an unknown name
//! - [`InvalidArgumentError`]: something that is not a message was added to an aggregate
//! - [`ConfigError`]: a definition file could not be read or parsed
//! - [`InputError`]: umbrella over all of the above plus the aggregate itself
//!
//! # Example
//!
//! ```rust,ignore
//! use inputset::prelude::*;
//!
//! fn signup(form: &mut InputSet, raw: serde_json::Map<String, Value>) -> InputResult<String> {
//!     form.parse(raw)?;
//!     Ok(form.get("email")?.to_string())
//! }
//!
//! match signup(&mut form, raw) {
//!     Ok(email) => println!("Welcome {}", email),
//!     Err(InputError::Validation(errors)) => {
//!         for entry in errors.entries() {
//!             println!("{:?}: {}", entry.reference, entry.message);
//!         }
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use crate::core::aggregate::AggregateValidationError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The main error type of the crate
#[derive(Debug, Error)]
pub enum InputError {
    /// Malformed field definition
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// Accessor called with an unknown field name
    #[error(transparent)]
    UnknownField(#[from] UnknownFieldError),

    /// Non-message added to an aggregate
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),

    /// One or more fields failed filtering or validation
    #[error(transparent)]
    Validation(#[from] AggregateValidationError),

    /// Definition file could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Validated values did not fit the requested type
    #[error("Failed to deserialize validated values: {message}")]
    Deserialize { message: String },
}

/// Error response structure, ready to be serialized by an integration layer
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl InputError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            InputError::Definition(_) => "DEFINITION_ERROR",
            InputError::UnknownField(_) => "UNKNOWN_FIELD",
            InputError::InvalidArgument(_) => "INVALID_ARGUMENT",
            InputError::Validation(_) => "VALIDATION_ERROR",
            InputError::Config(_) => "CONFIG_ERROR",
            InputError::Deserialize { .. } => "DESERIALIZE_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            InputError::Definition(e) => Some(serde_json::json!({ "field": e.field })),
            InputError::UnknownField(e) => Some(serde_json::json!({
                "field": e.field,
                "scope": e.scope.to_string()
            })),
            InputError::Validation(errors) => {
                Some(serde_json::json!({ "fields": errors.entries() }))
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for InputError {
    fn from(err: serde_json::Error) -> Self {
        InputError::Deserialize {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Definition Errors
// =============================================================================

/// A field definition could not be turned into a [`FieldDefinition`]
///
/// [`FieldDefinition`]: crate::core::field::FieldDefinition
#[derive(Debug, Error)]
#[error("Invalid definition for field '{field}': {cause}")]
pub struct DefinitionError {
    pub field: String,
    #[source]
    pub cause: DefinitionCause,
}

impl DefinitionError {
    pub fn new(field: impl Into<String>, cause: DefinitionCause) -> Self {
        Self {
            field: field.into(),
            cause,
        }
    }
}

/// Underlying reason a definition was rejected
#[derive(Debug, Error)]
pub enum DefinitionCause {
    #[error("definition must be a boolean, a list or a mapping, got {0}")]
    Shape(String),

    #[error("expected 1 to 3 positional entries (required, filter, validator), got {0}")]
    Arity(usize),

    #[error("'required' must be a boolean, got {0}")]
    RequiredType(String),

    #[error("{role} must be a name, a mapping or a list, got {actual}")]
    StrategyType { role: &'static str, actual: String },

    #[error("invalid {role}: {source}")]
    Strategy {
        role: &'static str,
        source: serde_json::Error,
    },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("{0}")]
    Parameter(String),
}

// =============================================================================
// Accessor Errors
// =============================================================================

/// Which value map an accessor looked in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldScope {
    Validated,
    Raw,
}

impl fmt::Display for FieldScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldScope::Validated => f.write_str("validated values"),
            FieldScope::Raw => f.write_str("raw values"),
        }
    }
}

/// Requested field is absent from the relevant value map
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown field '{field}' in {scope}")]
pub struct UnknownFieldError {
    pub field: String,
    pub scope: FieldScope,
}

/// `add_error_value` was handed something that is not a message
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid error argument{}: {reason}", .index.map(|i| format!(" at index {}", i)).unwrap_or_default())]
pub struct InvalidArgumentError {
    /// Position in the submitted list, when a list was submitted
    pub index: Option<usize>,
    pub reason: String,
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to loading definition files
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

/// A specialized Result type for input operations
pub type InputResult<T> = Result<T, InputError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::Message;

    #[test]
    fn test_definition_error_names_field() {
        let err = DefinitionError::new("age", DefinitionCause::Arity(5));
        let display = err.to_string();
        assert!(display.contains("'age'"));
        assert!(display.contains("got 5"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_unknown_field_display() {
        let err = UnknownFieldError {
            field: "nickname".to_string(),
            scope: FieldScope::Raw,
        };
        assert_eq!(err.to_string(), "Unknown field 'nickname' in raw values");
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = InvalidArgumentError {
            index: Some(2),
            reason: "not a message".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid error argument at index 2: not a message"
        );
        let err = InvalidArgumentError {
            index: None,
            reason: "not a message".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid error argument: not a message");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ParseError {
            file: Some("form.yaml".to_string()),
            message: "bad indent".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse config file 'form.yaml': bad indent"
        );
    }

    #[test]
    fn test_input_error_codes() {
        let err: InputError = UnknownFieldError {
            field: "x".to_string(),
            scope: FieldScope::Validated,
        }
        .into();
        assert_eq!(err.error_code(), "UNKNOWN_FIELD");

        let mut agg = AggregateValidationError::new();
        agg.add_error(Message::required(), Some("email"));
        let err: InputError = agg.into();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_validation_response_details() {
        let mut agg = AggregateValidationError::new();
        agg.add_error(Message::required(), Some("email"));
        let response = InputError::from(agg).to_response();

        assert_eq!(response.code, "VALIDATION_ERROR");
        let details = response.details.expect("details");
        assert_eq!(details["fields"][0]["field"], "email");
        assert_eq!(details["fields"][0]["code"], "REQUIRED");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: InputError = json_err.into();
        assert!(matches!(err, InputError::Deserialize { .. }));
    }
}
