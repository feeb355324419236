//! Built-in validators backing the declarative rules

pub mod format;
pub mod one_of;
pub mod required;
pub mod size;
pub mod types;

pub use format::{EmailValidator, PatternValidator, UuidValidator};
pub use one_of::OneOfValidator;
pub use required::RequiredValidator;
pub use size::SizeValidator;
pub use types::{TypeValidator, ValueType};
