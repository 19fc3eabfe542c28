//! Reusable field filters
//!
//! These filters normalize raw field values before validation. String-only
//! filters pass other types through untouched; coercing filters
//! ([`integer`], [`float`], [`boolean`], [`string`], [`uuid`]) reject values
//! they cannot convert.

use super::{Filter, FilterError, FilterResult};
use serde_json::{Value, json};
use std::sync::Arc;

/// Filter: return the value unchanged
pub fn identity() -> impl Fn(Value) -> FilterResult + Send + Sync + Clone {
    |value: Value| Ok(value)
}

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(Value) -> FilterResult + Send + Sync + Clone {
    |value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.trim().to_string()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: convert string to uppercase
pub fn uppercase() -> impl Fn(Value) -> FilterResult + Send + Sync + Clone {
    |value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.to_uppercase()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: convert string to lowercase
pub fn lowercase() -> impl Fn(Value) -> FilterResult + Send + Sync + Clone {
    |value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.to_lowercase()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: round number to specified decimal places
///
/// Numbers too large to scale by `10^decimals` are returned unchanged.
pub fn round_decimals(decimals: u32) -> impl Fn(Value) -> FilterResult + Send + Sync + Clone {
    let exponent = decimals.min(i32::MAX as u32) as i32;
    move |value: Value| {
        if let Some(num) = value.as_f64() {
            let scaled = num * 10_f64.powi(exponent);
            if !scaled.is_finite() {
                return Ok(value);
            }
            let rounded = scaled.round() / 10_f64.powi(exponent);
            if !rounded.is_finite() {
                return Ok(value);
            }
            Ok(json!(rounded))
        } else {
            Ok(value)
        }
    }
}

/// Filter: coerce to a signed integer
///
/// Accepts integers, floats without a fractional part, and numeric strings
/// (surrounding whitespace ignored). Results are limited to the `i64` range.
pub fn integer() -> impl Fn(Value) -> FilterResult + Send + Sync + Clone {
    |value: Value| match &value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(json!(i))
            } else if n.is_u64() {
                Err(FilterError::expected("integer in i64 range"))
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        Ok(json!(f as i64))
                    }
                    _ => Err(FilterError::expected("integer")),
                }
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(|i| json!(i))
            .map_err(|_| FilterError::expected("integer")),
        _ => Err(FilterError::expected("integer")),
    }
}

/// Filter: coerce to a floating point number
pub fn float() -> impl Fn(Value) -> FilterResult + Send + Sync + Clone {
    |value: Value| match &value {
        Value::Number(n) => n
            .as_f64()
            .map(|f| json!(f))
            .ok_or_else(|| FilterError::expected("float")),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(json!(f)),
            _ => Err(FilterError::expected("float")),
        },
        _ => Err(FilterError::expected("float")),
    }
}

/// Filter: coerce to a boolean
///
/// Strings `true/false`, `yes/no`, `on/off`, `1/0` (case-insensitive) and the
/// integers 1 and 0 are accepted.
pub fn boolean() -> impl Fn(Value) -> FilterResult + Send + Sync + Clone {
    |value: Value| match &value {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Ok(Value::Bool(true)),
            Some(0) => Ok(Value::Bool(false)),
            _ => Err(FilterError::expected("boolean")),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
            _ => Err(FilterError::expected("boolean")),
        },
        _ => Err(FilterError::expected("boolean")),
    }
}

/// Filter: render a scalar as a string; arrays and objects are rejected
pub fn string() -> impl Fn(Value) -> FilterResult + Send + Sync + Clone {
    |value: Value| match value {
        Value::String(_) => Ok(value),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        _ => Err(FilterError::expected("string")),
    }
}

/// Filter: parse a UUID and normalize it to lowercase hyphenated form
pub fn uuid() -> impl Fn(Value) -> FilterResult + Send + Sync + Clone {
    |value: Value| {
        let parsed = value
            .as_str()
            .and_then(|s| ::uuid::Uuid::parse_str(s.trim()).ok())
            .ok_or_else(|| FilterError::expected("uuid"))?;
        Ok(Value::String(parsed.hyphenated().to_string()))
    }
}

/// Filter: apply several filters in order, stopping at the first rejection
pub fn chain(
    filters: Vec<Arc<dyn Filter>>,
) -> impl Fn(Value) -> FilterResult + Send + Sync + Clone {
    move |value: Value| {
        filters
            .iter()
            .try_fold(value, |current, filter| filter.apply(current))
    }
}
