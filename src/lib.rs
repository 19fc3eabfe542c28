//! # inputset
//!
//! Definition-driven input collection and validation.
//!
//! ## Features
//!
//! - **Declarative Fields**: each field is a `(required, filter, validator)` triple
//! - **Filter then Validate**: coercion/normalization first, business rules second
//! - **Batched Errors**: every failing field is reported in one [`AggregateValidationError`]
//! - **Raw and Clean Values**: both stay accessible after a parse
//! - **Configuration-Based**: define fields via YAML
//! - **Pluggable Messages**: error strings come from an injectable translator
//!
//! ## Quick Start
//!
//! ```rust
//! use inputset::prelude::*;
//! use serde_json::json;
//!
//! let mut form = InputSet::new([
//!     ("email", Field::required().filter(filters::trim()).validator(validators::email())),
//!     ("age", Field::optional().filter(filters::integer()).validator(validators::positive())),
//! ]);
//!
//! let err = form
//!     .parse([("email", json!("")), ("age", json!("30"))])
//!     .unwrap_err();
//! assert_eq!(err.len(), 1);
//! assert_eq!(err.entries()[0].reference.as_deref(), Some("email"));
//! assert_eq!(form.get("age").unwrap(), &json!(30));
//! ```
//!
//! [`AggregateValidationError`]: crate::core::aggregate::AggregateValidationError

pub mod config;
pub mod core;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Pipeline ===
    pub use crate::core::{
        field::{Field, FieldDefaults, FieldDefinition},
        input::{InputSet, ValueMap},
    };

    // === Strategies ===
    pub use crate::core::validation::{
        Filter, FilterError, FilterResult, ValidationError, ValidationResult, Validator, filters,
        validators,
    };

    // === Errors ===
    pub use crate::core::aggregate::{AggregateValidationError, ErrorCode, FieldError, Message};
    pub use crate::core::error::{
        ConfigError, DefinitionCause, DefinitionError, ErrorResponse, FieldScope, InputError,
        InputResult, InvalidArgumentError, UnknownFieldError,
    };

    // === Messages ===
    pub use crate::core::translate::{DefaultTranslator, Translator};

    // === Config ===
    pub use crate::config::{FilterSpec, InputConfig, ValidatorSpec};

    // === External dependencies ===
    pub use serde_json::Value;
}
