//! Filtering and validation strategies
//!
//! A field runs its raw value through a [`Filter`] (coercion/normalization) and
//! then hands the result to a [`Validator`] (business rules). Both are plain
//! one-method traits; any matching closure implements them, which is how the
//! reusable strategies in [`filters`] and [`validators`] are written.

pub mod filters;
pub mod validators;

use serde_json::{Map, Value};
use std::fmt;

/// Result of applying a filter
pub type FilterResult = Result<Value, FilterError>;

/// Result of applying a validator
pub type ValidationResult = Result<(), ValidationError>;

/// Normalizes a raw value into its canonical form
pub trait Filter: Send + Sync {
    fn apply(&self, value: Value) -> FilterResult;
}

impl<F> Filter for F
where
    F: Fn(Value) -> FilterResult + Send + Sync,
{
    fn apply(&self, value: Value) -> FilterResult {
        self(value)
    }
}

/// Checks an already-filtered value without transforming it
pub trait Validator: Send + Sync {
    fn apply(&self, value: &Value) -> ValidationResult;
}

impl<F> Validator for F
where
    F: Fn(&Value) -> ValidationResult + Send + Sync,
{
    fn apply(&self, value: &Value) -> ValidationResult {
        self(value)
    }
}

/// A filter rejected the type or shape of its input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterError {
    /// Description of what the filter accepts (e.g. "integer")
    pub expected: String,
}

impl FilterError {
    pub fn expected(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}", self.expected)
    }
}

impl std::error::Error for FilterError {}

/// A validator rejected a well-typed value
///
/// `code` is a machine-readable rule identifier (e.g. `string_too_short`) and
/// doubles as the translation key; `params` carries whatever context the rule
/// wants to expose in the final message.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub code: String,
    pub params: Map<String, Value>,
}

impl ValidationError {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            params: Map::new(),
        }
    }

    /// Attach a context parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} {}", self.code, Value::Object(self.params.clone()))
        }
    }
}

impl std::error::Error for ValidationError {}
