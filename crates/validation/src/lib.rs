//! # restful-validation
//!
//! Declarative validation for resource models. Models describe their
//! constraints as rule sets (`"required|string|max:255"`), optionally with
//! custom message templates, and the [`Validator`] compiles and runs them
//! against request payloads.

pub mod error;
pub mod messages;
pub mod rule_set;
pub mod traits;
pub mod validator;
pub mod validators;

// Re-exports for easy access
pub use error::{RuleParseError, ValidationError, ValidationErrors, ValidationResult};
pub use messages::ValidationMessages;
pub use rule_set::{RuleSet, RuleSpec};
pub use traits::ValidationRule;
pub use validator::Validator;

// Built-in validators
pub use validators::{
    format::{EmailValidator, PatternValidator, UuidValidator},
    one_of::OneOfValidator,
    required::RequiredValidator,
    size::SizeValidator,
    types::{TypeValidator, ValueType},
};
