//! Definition-driven input collection
//!
//! An [`InputSet`] maps field names to [`FieldDefinition`]s, accepts a bag of
//! raw values and runs every defined field through its filter and validator.
//! Failures are collected field by field into one
//! [`AggregateValidationError`] instead of stopping at the first bad field.
//!
//! ```
//! use inputset::prelude::*;
//! use serde_json::json;
//!
//! let mut form = InputSet::new([
//!     ("email", Field::required().filter(filters::trim()).validator(validators::email())),
//!     ("age", Field::optional().filter(filters::integer())),
//! ]);
//!
//! form.parse(json!({"email": " a@b.com ", "age": "30"}).as_object().cloned().unwrap())
//!     .expect("valid input");
//! assert_eq!(form.get("age").unwrap(), &json!(30));
//!
//! let err = form.add_value("email", json!("")).unwrap_err();
//! assert_eq!(err.entries()[0].code, ErrorCode::Required);
//! ```

use crate::config::InputConfig;
use crate::core::aggregate::{AggregateValidationError, Message};
use crate::core::error::{DefinitionError, FieldScope, InputError, InputResult, UnknownFieldError};
use crate::core::field::{Field, FieldDefaults, FieldDefinition, is_absent, is_truthy, type_name};
use crate::core::translate::{DefaultTranslator, Translator};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Ordered name → value map used for raw and validated values
pub type ValueMap = IndexMap<String, Value>;

/// A set of field definitions plus the values of the most recent parse
#[derive(Clone)]
pub struct InputSet {
    definitions: IndexMap<String, FieldDefinition>,
    raw: ValueMap,
    validated: ValueMap,
    defaults: FieldDefaults,
    translator: Arc<dyn Translator>,
}

impl InputSet {
    /// Build a set from `(name, field)` pairs, using [`FieldDefaults::default`]
    pub fn new<I, K>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (K, Field)>,
        K: Into<String>,
    {
        let mut set = Self::empty();
        for (name, field) in definitions {
            set.add_definition(name, field);
        }
        set
    }

    /// A set without any definitions
    pub fn empty() -> Self {
        Self {
            definitions: IndexMap::new(),
            raw: ValueMap::new(),
            validated: ValueMap::new(),
            defaults: FieldDefaults::default(),
            translator: Arc::new(DefaultTranslator::new()),
        }
    }

    /// Replace the fallback strategies for fields added from now on
    pub fn with_defaults(mut self, defaults: FieldDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Replace the translator used to render error messages
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    /// Insert or replace a field definition
    ///
    /// Stored raw and validated values are left untouched; the new definition
    /// only applies to the next parse.
    pub fn add_definition(&mut self, name: impl Into<String>, field: Field) -> &mut Self {
        let name = name.into();
        let definition = field.resolve(&self.defaults);
        if self.definitions.insert(name.clone(), definition).is_some() {
            tracing::warn!(field = %name, "Replacing existing field definition");
        }
        self
    }

    /// Insert or replace a field from its dynamic description
    ///
    /// See [`crate::config`] for the accepted shapes.
    pub fn add_definition_spec(
        &mut self,
        name: impl Into<String>,
        spec: &Value,
    ) -> Result<&mut Self, DefinitionError> {
        let name = name.into();
        let field = crate::config::field_from_spec(&name, spec)?;
        Ok(self.add_definition(name, field))
    }

    /// Build a set from a definition file
    pub fn from_config(config: &InputConfig) -> Result<Self, DefinitionError> {
        let mut set = Self::empty();
        set.load_config(config)?;
        Ok(set)
    }

    /// Add every field of `config`, using this set's defaults
    ///
    /// Nothing is added if any field is malformed.
    pub fn load_config(&mut self, config: &InputConfig) -> Result<&mut Self, DefinitionError> {
        let fields = config.resolve()?;
        tracing::debug!(
            config = config.name.as_deref().unwrap_or("<unnamed>"),
            fields = fields.len(),
            "Loading field definitions"
        );
        for (name, field) in fields {
            self.add_definition(name, field);
        }
        Ok(self)
    }

    /// Replace the raw values and run every defined field through its
    /// filter and validator
    ///
    /// All fields are processed even after a failure. On error the validated
    /// values are only partially populated and should not be trusted.
    pub fn parse<I, K>(&mut self, raw: I) -> Result<&mut Self, AggregateValidationError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.raw = raw.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.validated = self
            .definitions
            .keys()
            .map(|name| (name.clone(), Value::Null))
            .collect();

        tracing::debug!(
            fields = self.definitions.len(),
            submitted = self.raw.len(),
            "Parsing input"
        );

        let mut errors = AggregateValidationError::with_translator(Arc::clone(&self.translator));

        for (name, definition) in &self.definitions {
            let value = self.raw.get(name).cloned().unwrap_or(Value::Null);

            if is_absent(&value) {
                if definition.is_required() {
                    tracing::trace!(field = %name, "Required field missing");
                    errors.add_error(Message::required(), Some(name.as_str()));
                }
                continue;
            }

            let actual = type_name(&value);
            let filtered = match definition.filter().apply(value) {
                Ok(filtered) => filtered,
                Err(e) => {
                    tracing::trace!(
                        field = %name,
                        expected = %e.expected,
                        actual,
                        "Filter rejected value"
                    );
                    errors.add_error(
                        Message::type_mismatch(e.expected, actual),
                        Some(name.as_str()),
                    );
                    continue;
                }
            };

            match definition.validator().apply(&filtered) {
                Ok(()) => {
                    self.validated.insert(name.clone(), filtered);
                }
                Err(e) => {
                    tracing::trace!(field = %name, rule = %e.code, "Validator rejected value");
                    errors.add_error(Message::validation_failed(e), Some(name.as_str()));
                }
            }
        }

        if errors.has_errors() {
            tracing::debug!(errors = errors.len(), "Input rejected");
            return Err(errors);
        }

        Ok(self)
    }

    /// Re-parse with one raw value replaced
    ///
    /// The whole pipeline runs again, so unrelated fields are re-validated
    /// too.
    pub fn add_value(
        &mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Result<&mut Self, AggregateValidationError> {
        let mut raw = self.raw.clone();
        raw.insert(name.into(), value);
        self.parse(raw)
    }

    /// Validated value of a field
    pub fn get(&self, name: &str) -> Result<&Value, UnknownFieldError> {
        self.validated.get(name).ok_or_else(|| UnknownFieldError {
            field: name.to_string(),
            scope: FieldScope::Validated,
        })
    }

    /// Raw value of a field as last submitted
    pub fn get_raw(&self, name: &str) -> Result<&Value, UnknownFieldError> {
        self.raw.get(name).ok_or_else(|| UnknownFieldError {
            field: name.to_string(),
            scope: FieldScope::Raw,
        })
    }

    pub fn has(&self, name: &str) -> bool {
        self.validated.contains_key(name)
    }

    pub fn has_raw(&self, name: &str) -> bool {
        self.raw.contains_key(name)
    }

    /// Validated values, optionally without falsy entries
    ///
    /// `omit_empty` uses general truthiness, so `0`, `false` and `"0"` are
    /// dropped along with `null` and `""` (see [`is_truthy`]).
    pub fn to_map(&self, omit_empty: bool) -> ValueMap {
        if omit_empty {
            self.validated
                .iter()
                .filter(|(_, value)| is_truthy(value))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect()
        } else {
            self.validated.clone()
        }
    }

    /// Deserialize the validated values into a typed struct
    pub fn deserialize<T: DeserializeOwned>(&self) -> InputResult<T> {
        let object: serde_json::Map<String, Value> = self
            .validated
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        serde_json::from_value(Value::Object(object)).map_err(InputError::from)
    }

    pub fn raw_values(&self) -> &ValueMap {
        &self.raw
    }

    pub fn validated_values(&self) -> &ValueMap {
        &self.validated
    }

    pub fn definition(&self, name: &str) -> Option<&FieldDefinition> {
        self.definitions.get(name)
    }

    /// Defined field names in definition order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }
}

impl Default for InputSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for InputSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputSet")
            .field("definitions", &self.definitions)
            .field("raw", &self.raw)
            .field("validated", &self.validated)
            .finish_non_exhaustive()
    }
}
