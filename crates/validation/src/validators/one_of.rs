//! `in:` validator

use crate::error::{ValidationError, ValidationResult};
use crate::messages::render;
use crate::traits::ValidationRule;
use async_trait::async_trait;
use serde_json::Value;

/// Accepts only values from a fixed list. Numbers and booleans are compared by
/// their string spelling, matching how the list is declared.
#[derive(Debug, Clone)]
pub struct OneOfValidator {
    pub allowed: Vec<String>,
    pub message: Option<String>,
}

impl OneOfValidator {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            message: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn spelling(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

#[async_trait]
impl ValidationRule for OneOfValidator {
    async fn validate(&self, value: &Value, field: &str) -> ValidationResult<()> {
        if Self::spelling(value).is_some_and(|s| self.allowed.contains(&s)) {
            return Ok(());
        }
        let template = self
            .message
            .as_deref()
            .unwrap_or("The selected :attribute is invalid.");
        let params = [(":values", self.allowed.join(", "))];
        Err(ValidationError::for_rule(field, render(template, field, &params), "in").into())
    }

    fn rule_name(&self) -> &'static str {
        "in"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_allowed_values() {
        let validator = OneOfValidator::new(["draft", "published"]);
        assert!(validator.validate(&json!("draft"), "status").await.is_ok());
        assert!(validator.validate(&json!("archived"), "status").await.is_err());
    }

    #[tokio::test]
    async fn test_numbers_compare_by_spelling() {
        let validator = OneOfValidator::new(["1", "2"]);
        assert!(validator.validate(&json!(2), "level").await.is_ok());
        assert!(validator.validate(&json!(3), "level").await.is_err());
    }

    #[tokio::test]
    async fn test_values_placeholder() {
        let errors = OneOfValidator::new(["a", "b"])
            .message(":attribute must be one of :values")
            .validate(&json!("c"), "kind")
            .await
            .unwrap_err();
        assert_eq!(errors.first("kind"), Some("kind must be one of a, b"));
    }
}
