//! Configuration loading and dynamic field definitions
//!
//! A definition file lists fields in order. Each field may be written as:
//!
//! - a boolean: the required flag, default filter and validator
//! - a positional list `[required, filter?, validator?]`
//! - a mapping with `required`, `filter` and `validator` keys
//!
//! A filter or validator is a kind name (`trim`), a tagged mapping
//! (`{type: string_length, min: 3, max: 20}`) or a list of those, which
//! chains filters or requires every validator to pass.
//!
//! ```yaml
//! name: signup
//! fields:
//!   email: [true, [trim, lowercase], email]
//!   age:
//!     filter: integer
//!     validator: {type: min_value, min: 18}
//!   newsletter: false
//! ```

use crate::core::error::{ConfigError, DefinitionCause, DefinitionError};
use crate::core::field::{Field, type_name};
use crate::core::validation::{Filter, Validator, filters, validators};
use indexmap::IndexMap;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

/// A named set of field definitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Optional name of the form or endpoint
    #[serde(default)]
    pub name: Option<String>,

    /// Field name -> definition, in declaration order
    #[serde(default)]
    pub fields: IndexMap<String, Value>,
}

impl InputConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Merge several configurations
    ///
    /// Fields keep their first-seen position; a later definition of the same
    /// field replaces the earlier one. The last non-empty name wins.
    pub fn merge(configs: Vec<InputConfig>) -> Self {
        let mut merged = InputConfig::default();
        for config in configs {
            if config.name.is_some() {
                merged.name = config.name;
            }
            for (field, spec) in config.fields {
                merged.fields.insert(field, spec);
            }
        }
        merged
    }

    /// Resolve every field, failing on the first malformed one
    pub fn resolve(&self) -> Result<Vec<(String, Field)>, DefinitionError> {
        self.fields
            .iter()
            .map(|(name, spec)| Ok((name.clone(), field_from_spec(name, spec)?)))
            .collect()
    }
}

/// Turn one dynamic field description into a [`Field`]
pub fn field_from_spec(name: &str, spec: &Value) -> Result<Field, DefinitionError> {
    resolve_field(spec).map_err(|cause| DefinitionError::new(name, cause))
}

fn resolve_field(spec: &Value) -> Result<Field, DefinitionCause> {
    match spec {
        Value::Bool(required) => Ok(Field::new(*required, None, None)),
        Value::Array(items) => {
            if items.is_empty() || items.len() > 3 {
                return Err(DefinitionCause::Arity(items.len()));
            }
            let required = required_flag(&items[0])?;
            let filter = items.get(1).map(filter_entry).transpose()?.flatten();
            let validator = items.get(2).map(validator_entry).transpose()?.flatten();
            Ok(Field::new(required, filter, validator))
        }
        Value::Object(map) => {
            if let Some(unknown) = map
                .keys()
                .find(|k| !matches!(k.as_str(), "required" | "filter" | "validator"))
            {
                return Err(DefinitionCause::Parameter(format!(
                    "unknown key '{}'",
                    unknown
                )));
            }
            let required = match map.get("required") {
                Some(flag) => required_flag(flag)?,
                None => false,
            };
            let filter = map.get("filter").map(filter_entry).transpose()?.flatten();
            let validator = map
                .get("validator")
                .map(validator_entry)
                .transpose()?
                .flatten();
            Ok(Field::new(required, filter, validator))
        }
        other => Err(DefinitionCause::Shape(type_name(other).to_string())),
    }
}

fn required_flag(value: &Value) -> Result<bool, DefinitionCause> {
    value
        .as_bool()
        .ok_or_else(|| DefinitionCause::RequiredType(type_name(value).to_string()))
}

fn filter_entry(spec: &Value) -> Result<Option<Arc<dyn Filter>>, DefinitionCause> {
    match spec {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let chain = items
                .iter()
                .map(|item| tagged::<FilterSpec>(item, "filter").map(|s| s.build()))
                .collect::<Result<Vec<_>, _>>()?;
            let filter: Arc<dyn Filter> = Arc::new(filters::chain(chain));
            Ok(Some(filter))
        }
        other => Ok(Some(tagged::<FilterSpec>(other, "filter")?.build())),
    }
}

fn validator_entry(spec: &Value) -> Result<Option<Arc<dyn Validator>>, DefinitionCause> {
    match spec {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let rules = items
                .iter()
                .map(|item| tagged::<ValidatorSpec>(item, "validator")?.build())
                .collect::<Result<Vec<_>, _>>()?;
            let validator: Arc<dyn Validator> = Arc::new(validators::all(rules));
            Ok(Some(validator))
        }
        other => Ok(Some(tagged::<ValidatorSpec>(other, "validator")?.build()?)),
    }
}

/// Parse a kind name or tagged mapping into a strategy spec
fn tagged<T: DeserializeOwned>(spec: &Value, role: &'static str) -> Result<T, DefinitionCause> {
    let tagged = match spec {
        Value::String(kind) => json!({ "type": kind }),
        Value::Object(_) => spec.clone(),
        other => {
            return Err(DefinitionCause::StrategyType {
                role,
                actual: type_name(other).to_string(),
            });
        }
    };
    serde_json::from_value(tagged)
        .map_err(|source| DefinitionCause::Strategy { role, source })
}

/// Filters that can be named in a definition file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterSpec {
    Identity,
    Trim,
    Lowercase,
    Uppercase,
    RoundDecimals { decimals: u32 },
    Integer,
    Float,
    Boolean,
    #[serde(rename = "string")]
    Stringify,
    Uuid,
}

impl FilterSpec {
    pub fn build(&self) -> Arc<dyn Filter> {
        match self {
            FilterSpec::Identity => Arc::new(filters::identity()),
            FilterSpec::Trim => Arc::new(filters::trim()),
            FilterSpec::Lowercase => Arc::new(filters::lowercase()),
            FilterSpec::Uppercase => Arc::new(filters::uppercase()),
            FilterSpec::RoundDecimals { decimals } => {
                Arc::new(filters::round_decimals(*decimals))
            }
            FilterSpec::Integer => Arc::new(filters::integer()),
            FilterSpec::Float => Arc::new(filters::float()),
            FilterSpec::Boolean => Arc::new(filters::boolean()),
            FilterSpec::Stringify => Arc::new(filters::string()),
            FilterSpec::Uuid => Arc::new(filters::uuid()),
        }
    }
}

fn unbounded() -> usize {
    usize::MAX
}

/// Validators that can be named in a definition file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidatorSpec {
    Noop,
    Positive,
    StringLength {
        #[serde(default)]
        min: usize,
        #[serde(default = "unbounded")]
        max: usize,
    },
    MinValue {
        min: f64,
    },
    MaxValue {
        max: f64,
    },
    InList {
        values: Vec<String>,
    },
    DateFormat {
        format: String,
    },
    Email,
    Url,
    Pattern {
        regex: String,
    },
}

impl ValidatorSpec {
    /// Build the validator, checking parameters that serde cannot
    pub fn build(&self) -> Result<Arc<dyn Validator>, DefinitionCause> {
        let validator: Arc<dyn Validator> = match self {
            ValidatorSpec::Noop => Arc::new(validators::noop()),
            ValidatorSpec::Positive => Arc::new(validators::positive()),
            ValidatorSpec::StringLength { min, max } => {
                if min > max {
                    return Err(DefinitionCause::Parameter(format!(
                        "string_length min ({}) is greater than max ({})",
                        min, max
                    )));
                }
                Arc::new(validators::string_length(*min, *max))
            }
            ValidatorSpec::MinValue { min } => Arc::new(validators::min_value(*min)),
            ValidatorSpec::MaxValue { max } => Arc::new(validators::max_value(*max)),
            ValidatorSpec::InList { values } => Arc::new(validators::in_list(values.clone())),
            ValidatorSpec::DateFormat { format } => {
                if format.is_empty() {
                    return Err(DefinitionCause::Parameter(
                        "date_format requires a non-empty format".to_string(),
                    ));
                }
                Arc::new(validators::date_format(format.clone()))
            }
            ValidatorSpec::Email => Arc::new(validators::email()),
            ValidatorSpec::Url => Arc::new(validators::url()),
            ValidatorSpec::Pattern { regex } => Arc::new(validators::pattern(Regex::new(regex)?)),
        };
        Ok(validator)
    }
}
