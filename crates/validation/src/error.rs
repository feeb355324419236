//! Validation error types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationErrors>;

/// A single failed rule for a single field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Rendered, human-readable message
    pub message: String,
    /// Name of the rule that failed (`required`, `max`, ...)
    pub rule: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: "validation_failed".to_string(),
        }
    }

    pub fn for_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: rule.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation failures grouped by field.
///
/// Fields are kept sorted so that rendered output and API error bodies are
/// stable between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Error)]
pub struct ValidationErrors {
    pub errors: BTreeMap<String, Vec<ValidationError>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors
            .entry(error.field.clone())
            .or_default()
            .push(error);
    }

    /// Add a plain message for a field
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.add(ValidationError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with at least one error
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn total_errors(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn get_field_errors(&self, field: &str) -> Option<&Vec<ValidationError>> {
        self.errors.get(field)
    }

    pub fn has_field_errors(&self, field: &str) -> bool {
        self.errors.get(field).is_some_and(|e| !e.is_empty())
    }

    /// First message recorded for a field
    pub fn first(&self, field: &str) -> Option<&str> {
        self.errors
            .get(field)
            .and_then(|e| e.first())
            .map(|e| e.message.as_str())
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, errors) in other.errors {
            self.errors.entry(field).or_default().extend(errors);
        }
    }

    pub fn from_error(error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.add(error);
        errors
    }

    /// Shape used in API error responses: field name to list of messages
    pub fn to_json(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .errors
            .iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|e| serde_json::Value::String(e.message.clone()))
                    .collect();
                (field.clone(), serde_json::Value::Array(messages))
            })
            .collect();

        serde_json::json!({
            "message": "The given data was invalid.",
            "errors": fields,
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "No validation errors");
        }
        write!(f, "Validation failed for {} field(s):", self.errors.len())?;
        for (field, field_errors) in &self.errors {
            for error in field_errors {
                write!(f, "\n  {}: {}", field, error.message)?;
            }
        }
        Ok(())
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self::from_error(error)
    }
}

/// A rule declaration that could not be compiled into a validator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleParseError {
    #[error("Unknown validation rule '{rule}' on field '{field}'")]
    UnknownRule { field: String, rule: String },

    #[error("Rule '{rule}' on field '{field}' requires a parameter")]
    MissingParameter { field: String, rule: String },

    #[error("Invalid parameter '{value}' for rule '{rule}' on field '{field}'")]
    InvalidParameter {
        field: String,
        rule: String,
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_grouped_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add_error("email", "Invalid format");
        errors.add_error("age", "Must be positive");
        errors.add_error("email", "Already taken");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.total_errors(), 3);
        assert!(errors.has_field_errors("email"));
        assert!(!errors.has_field_errors("name"));
        assert_eq!(errors.first("email"), Some("Invalid format"));
    }

    #[test]
    fn test_merge() {
        let mut a = ValidationErrors::from_error(ValidationError::new("name", "x"));
        let mut b = ValidationErrors::new();
        b.add_error("name", "y");
        b.add_error("title", "z");

        a.merge(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.get_field_errors("name").unwrap().len(), 2);
    }

    #[test]
    fn test_to_json_shape() {
        let errors = ValidationErrors::from_error(ValidationError::for_rule(
            "name",
            "The name field is required.",
            "required",
        ));

        let body = errors.to_json();
        assert_eq!(body["errors"]["name"][0], "The name field is required.");
    }
}
