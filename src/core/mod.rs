//! Core module containing the validation pipeline and its error types

pub mod aggregate;
pub mod error;
pub mod field;
pub mod input;
pub mod translate;
pub mod validation;

pub use aggregate::{AggregateValidationError, ErrorCode, ErrorSource, FieldError, Message};
pub use error::{
    ConfigError, DefinitionCause, DefinitionError, ErrorResponse, FieldScope, InputError,
    InputResult, InvalidArgumentError, UnknownFieldError,
};
pub use field::{Field, FieldDefaults, FieldDefinition};
pub use input::{InputSet, ValueMap};
pub use translate::{DefaultTranslator, Translator};
pub use validation::{Filter, FilterError, ValidationError, Validator};
