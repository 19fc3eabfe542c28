//! Reusable field validators
//!
//! Rules only inspect the value types they are about: a length rule lets
//! numbers through, a range rule lets strings through. Pair them with a
//! coercing filter when the type itself matters.

use super::{ValidationError, ValidationResult, Validator};
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;
use validator::{ValidateEmail, ValidateUrl};

/// Validator: always valid
pub fn noop() -> impl Fn(&Value) -> ValidationResult + Send + Sync + Clone {
    |_: &Value| Ok(())
}

/// Validator: number must be positive
pub fn positive() -> impl Fn(&Value) -> ValidationResult + Send + Sync + Clone {
    |value: &Value| {
        if let Some(num) = value.as_f64() {
            if num <= 0.0 {
                Err(ValidationError::new("not_positive").with_param("value", num))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: string length (in characters) must be within range
pub fn string_length(
    min: usize,
    max: usize,
) -> impl Fn(&Value) -> ValidationResult + Send + Sync + Clone {
    move |value: &Value| {
        if let Some(s) = value.as_str() {
            let len = s.chars().count();
            if len < min {
                Err(ValidationError::new("string_too_short")
                    .with_param("min", min)
                    .with_param("length", len))
            } else if len > max {
                Err(ValidationError::new("string_too_long")
                    .with_param("max", max)
                    .with_param("length", len))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: number must not be below minimum
pub fn min_value(min: f64) -> impl Fn(&Value) -> ValidationResult + Send + Sync + Clone {
    move |value: &Value| match value.as_f64() {
        Some(num) if num < min => Err(ValidationError::new("value_too_small")
            .with_param("min", min)
            .with_param("value", num)),
        _ => Ok(()),
    }
}

/// Validator: number must not exceed maximum
pub fn max_value(max: f64) -> impl Fn(&Value) -> ValidationResult + Send + Sync + Clone {
    move |value: &Value| match value.as_f64() {
        Some(num) if num > max => Err(ValidationError::new("value_too_large")
            .with_param("max", max)
            .with_param("value", num)),
        _ => Ok(()),
    }
}

/// Validator: value must be in allowed list
pub fn in_list(allowed: Vec<String>) -> impl Fn(&Value) -> ValidationResult + Send + Sync + Clone {
    move |value: &Value| {
        if let Some(s) = value.as_str() {
            if !allowed.iter().any(|a| a == s) {
                Err(ValidationError::new("not_in_list")
                    .with_param("allowed", allowed.join(", "))
                    .with_param("value", s))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: date must match a chrono format string
pub fn date_format(
    format: impl Into<String>,
) -> impl Fn(&Value) -> ValidationResult + Send + Sync + Clone {
    let format = format.into();
    move |value: &Value| {
        if let Some(s) = value.as_str() {
            match chrono::NaiveDate::parse_from_str(s, &format) {
                Ok(_) => Ok(()),
                Err(_) => Err(ValidationError::new("invalid_date_format")
                    .with_param("format", format.as_str())
                    .with_param("value", s)),
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: string must be an email address
pub fn email() -> impl Fn(&Value) -> ValidationResult + Send + Sync + Clone {
    |value: &Value| match value.as_str() {
        Some(s) if !s.validate_email() => {
            Err(ValidationError::new("invalid_email").with_param("value", s))
        }
        _ => Ok(()),
    }
}

/// Validator: string must be an absolute URL
pub fn url() -> impl Fn(&Value) -> ValidationResult + Send + Sync + Clone {
    |value: &Value| match value.as_str() {
        Some(s) if !s.validate_url() => {
            Err(ValidationError::new("invalid_url").with_param("value", s))
        }
        _ => Ok(()),
    }
}

/// Validator: string must match the pattern
pub fn pattern(regex: Regex) -> impl Fn(&Value) -> ValidationResult + Send + Sync + Clone {
    move |value: &Value| match value.as_str() {
        Some(s) if !regex.is_match(s) => Err(ValidationError::new("pattern_mismatch")
            .with_param("pattern", regex.as_str())
            .with_param("value", s)),
        _ => Ok(()),
    }
}

/// Validator: every rule must pass; the first failure is reported
pub fn all(
    validators: Vec<Arc<dyn Validator>>,
) -> impl Fn(&Value) -> ValidationResult + Send + Sync + Clone {
    move |value: &Value| validators.iter().try_for_each(|v| v.apply(value))
}
