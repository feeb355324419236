//! Required field validator

use crate::error::{ValidationError, ValidationResult};
use crate::messages::render;
use crate::traits::ValidationRule;
use async_trait::async_trait;
use serde_json::Value;

const DEFAULT_MESSAGE: &str = "The :attribute field is required.";

/// Fails on null, blank strings and empty arrays or objects
#[derive(Debug, Clone, Default)]
pub struct RequiredValidator {
    pub message: Option<String>,
}

impl RequiredValidator {
    pub fn new() -> Self {
        Self { message: None }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn is_empty(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::Array(arr) => arr.is_empty(),
            Value::Object(obj) => obj.is_empty(),
            _ => false,
        }
    }

    /// The error reported when a required field is missing entirely
    pub fn missing(&self, field: &str) -> ValidationError {
        let template = self.message.as_deref().unwrap_or(DEFAULT_MESSAGE);
        ValidationError::for_rule(field, render(template, field, &[]), "required")
    }
}

#[async_trait]
impl ValidationRule for RequiredValidator {
    async fn validate(&self, value: &Value, field: &str) -> ValidationResult<()> {
        if Self::is_empty(value) {
            Err(self.missing(field).into())
        } else {
            Ok(())
        }
    }

    fn rule_name(&self) -> &'static str {
        "required"
    }
}
