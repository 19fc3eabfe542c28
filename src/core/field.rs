//! Field definitions and value helpers

use crate::core::validation::{Filter, Validator, filters, validators};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Fallback strategies used when a field does not name its own
///
/// Injected into an [`InputSet`](crate::core::input::InputSet) at
/// construction. The default is the identity filter and the no-op validator.
#[derive(Clone)]
pub struct FieldDefaults {
    pub filter: Arc<dyn Filter>,
    pub validator: Arc<dyn Validator>,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            filter: Arc::new(filters::identity()),
            validator: Arc::new(validators::noop()),
        }
    }
}

impl fmt::Debug for FieldDefaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefaults").finish_non_exhaustive()
    }
}

/// The (required, filter?, validator?) triple describing one field
///
/// ```
/// use inputset::core::field::Field;
/// use inputset::core::validation::{filters, validators};
///
/// let age = Field::optional()
///     .filter(filters::integer())
///     .validator(validators::positive());
/// assert!(!age.is_required());
/// ```
#[derive(Clone, Default)]
pub struct Field {
    required: bool,
    filter: Option<Arc<dyn Filter>>,
    validator: Option<Arc<dyn Validator>>,
}

impl Field {
    pub fn new(
        required: bool,
        filter: Option<Arc<dyn Filter>>,
        validator: Option<Arc<dyn Validator>>,
    ) -> Self {
        Self {
            required,
            filter,
            validator,
        }
    }

    pub fn required() -> Self {
        Self::new(true, None, None)
    }

    pub fn optional() -> Self {
        Self::new(false, None, None)
    }

    pub fn filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Use a filter that is shared with other fields
    pub fn shared_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Use a validator that is shared with other fields
    pub fn shared_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Fill the gaps from `defaults`
    pub fn resolve(self, defaults: &FieldDefaults) -> FieldDefinition {
        FieldDefinition {
            required: self.required,
            filter: self.filter.unwrap_or_else(|| Arc::clone(&defaults.filter)),
            validator: self
                .validator
                .unwrap_or_else(|| Arc::clone(&defaults.validator)),
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("required", &self.required)
            .field("filter", &self.filter.is_some())
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// A fully resolved field: filter and validator are always present
#[derive(Clone)]
pub struct FieldDefinition {
    required: bool,
    filter: Arc<dyn Filter>,
    validator: Arc<dyn Validator>,
}

impl FieldDefinition {
    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn filter(&self) -> &Arc<dyn Filter> {
        &self.filter
    }

    pub fn validator(&self) -> &Arc<dyn Validator> {
        &self.validator
    }
}

impl fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// JSON type name of a value, as reported in type mismatch errors
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Whether a raw value counts as "not provided" (null or empty string)
pub fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// General truthiness: `null`, `false`, `0`, `0.0`, `""`, `"0"`, `[]` and
/// `{}` are falsy, everything else is truthy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_uses_defaults_when_missing() {
        let def = Field::required().resolve(&FieldDefaults::default());
        assert!(def.is_required());
        assert_eq!(def.filter().apply(json!(" x ")).unwrap(), json!(" x "));
        assert!(def.validator().apply(&json!(null)).is_ok());
    }

    #[test]
    fn test_resolve_keeps_explicit_strategies() {
        let def = Field::optional()
            .filter(filters::trim())
            .validator(validators::string_length(2, 4))
            .resolve(&FieldDefaults::default());
        assert!(!def.is_required());
        assert_eq!(def.filter().apply(json!(" x ")).unwrap(), json!("x"));
        assert!(def.validator().apply(&json!("x")).is_err());
    }

    #[test]
    fn test_custom_defaults_are_injected() {
        let defaults = FieldDefaults {
            filter: Arc::new(filters::trim()),
            validator: Arc::new(validators::noop()),
        };
        let def = Field::optional().resolve(&defaults);
        assert_eq!(def.filter().apply(json!(" y ")).unwrap(), json!("y"));
    }

    #[test]
    fn test_type_name() {
        assert_eq!(type_name(&json!(1)), "integer");
        assert_eq!(type_name(&json!(1.5)), "float");
        assert_eq!(type_name(&json!("1")), "string");
        assert_eq!(type_name(&json!({})), "object");
    }

    #[test]
    fn test_is_absent() {
        assert!(is_absent(&json!(null)));
        assert!(is_absent(&json!("")));
        assert!(!is_absent(&json!(" ")));
        assert!(!is_absent(&json!(0)));
    }

    #[test]
    fn test_truthiness() {
        let falsy_values = [
            json!(null),
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!("0"),
            json!([]),
            json!({}),
        ];
        for falsy in falsy_values {
            assert!(!is_truthy(&falsy), "{} should be falsy", falsy);
        }
        let truthy_values = [
            json!(true),
            json!(-1),
            json!("0.0"),
            json!(" "),
            json!([0]),
            json!({"a": null}),
        ];
        for truthy in truthy_values {
            assert!(is_truthy(&truthy), "{} should be truthy", truthy);
        }
    }
}
