//! Error types for resource model operations

use std::fmt;

use restful_validation::{RuleParseError, ValidationErrors};

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Error types for resource model operations.
///
/// Storage failures are carried through unchanged as `Database` / `NotFound`;
/// the identifier and creation paths never add error kinds of their own.
#[derive(Debug, Clone)]
pub enum ModelError {
    /// Storage layer error
    Database(String),
    /// Model not found
    NotFound(String),
    /// Payload failed validation or touched immutable attributes
    Validation(ValidationErrors),
    /// Operation requires a persisted model
    MissingPrimaryKey,
    /// Serialization/deserialization error
    Serialization(String),
    /// Identifier is neither an integer nor a canonical UUID
    InvalidKey(String),
    /// A lifecycle observer aborted the operation
    Event(String),
    /// Model declaration error, e.g. an unparsable validation rule
    Configuration(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Database(msg) => write!(f, "Database error: {}", msg),
            ModelError::NotFound(what) => write!(f, "Record not found: {}", what),
            ModelError::Validation(errors) => write!(f, "Validation error: {}", errors),
            ModelError::MissingPrimaryKey => write!(f, "Primary key is missing or invalid"),
            ModelError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            ModelError::InvalidKey(msg) => write!(f, "Invalid key error: {}", msg),
            ModelError::Event(msg) => write!(f, "Event error: {}", msg),
            ModelError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}

impl ModelError {
    /// Validation errors, when this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ModelError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for ModelError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ModelError::NotFound(err.to_string()),
            other => ModelError::Database(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Serialization(err.to_string())
    }
}

impl From<ValidationErrors> for ModelError {
    fn from(errors: ValidationErrors) -> Self {
        ModelError::Validation(errors)
    }
}

impl From<RuleParseError> for ModelError {
    fn from(err: RuleParseError) -> Self {
        ModelError::Configuration(err.to_string())
    }
}
