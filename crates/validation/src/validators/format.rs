//! Format validators: `email`, `uuid`, `regex`

use crate::error::{ValidationError, ValidationResult};
use crate::messages::render;
use crate::traits::ValidationRule;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$")
        .expect("email pattern is valid")
});

static CANONICAL_UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("uuid pattern is valid")
});

/// True for the canonical hyphenated 8-4-4-4-12 form, in either case.
/// Braced, URN and unhyphenated spellings are rejected.
pub fn is_canonical_uuid(value: &str) -> bool {
    CANONICAL_UUID.is_match(value)
}

fn string_matches(value: &Value, check: impl Fn(&str) -> bool) -> bool {
    value.as_str().is_some_and(check)
}

fn failure(field: &str, template: &str, rule: &str) -> ValidationResult<()> {
    Err(ValidationError::for_rule(field, render(template, field, &[]), rule).into())
}

#[derive(Debug, Clone, Default)]
pub struct EmailValidator {
    pub message: Option<String>,
}

impl EmailValidator {
    pub fn new() -> Self {
        Self { message: None }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[async_trait]
impl ValidationRule for EmailValidator {
    async fn validate(&self, value: &Value, field: &str) -> ValidationResult<()> {
        if string_matches(value, |s| EMAIL_PATTERN.is_match(s)) {
            return Ok(());
        }
        let template = self
            .message
            .as_deref()
            .unwrap_or("The :attribute must be a valid email address.");
        failure(field, template, "email")
    }

    fn rule_name(&self) -> &'static str {
        "email"
    }
}

#[derive(Debug, Clone, Default)]
pub struct UuidValidator {
    pub message: Option<String>,
}

impl UuidValidator {
    pub fn new() -> Self {
        Self { message: None }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[async_trait]
impl ValidationRule for UuidValidator {
    async fn validate(&self, value: &Value, field: &str) -> ValidationResult<()> {
        if string_matches(value, is_canonical_uuid) {
            return Ok(());
        }
        let template = self
            .message
            .as_deref()
            .unwrap_or("The :attribute must be a valid UUID.");
        failure(field, template, "uuid")
    }

    fn rule_name(&self) -> &'static str {
        "uuid"
    }
}

/// Matches string values against a regular expression (search semantics,
/// anchor the pattern to require a full match)
#[derive(Debug, Clone)]
pub struct PatternValidator {
    pattern: Regex,
    pub message: Option<String>,
}

impl PatternValidator {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            message: None,
        })
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn pattern_string(&self) -> &str {
        self.pattern.as_str()
    }
}

#[async_trait]
impl ValidationRule for PatternValidator {
    async fn validate(&self, value: &Value, field: &str) -> ValidationResult<()> {
        if string_matches(value, |s| self.pattern.is_match(s)) {
            return Ok(());
        }
        let template = self
            .message
            .as_deref()
            .unwrap_or("The :attribute format is invalid.");
        failure(field, template, "regex")
    }

    fn rule_name(&self) -> &'static str {
        "regex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_uuid_detection() {
        assert!(is_canonical_uuid("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
        assert!(is_canonical_uuid("3FA85F64-5717-4562-B3FC-2C963F66AFA6"));
        assert!(!is_canonical_uuid("3fa85f6457174562b3fc2c963f66afa6"));
        assert!(!is_canonical_uuid("{3fa85f64-5717-4562-b3fc-2c963f66afa6}"));
        assert!(!is_canonical_uuid("urn:uuid:3fa85f64-5717-4562-b3fc-2c963f66afa6"));
        assert!(!is_canonical_uuid("42"));
        assert!(!is_canonical_uuid(""));
    }

    #[tokio::test]
    async fn test_email() {
        let validator = EmailValidator::new();
        assert!(validator.validate(&json!("jane@example.com"), "email").await.is_ok());
        assert!(validator.validate(&json!("jane@"), "email").await.is_err());
        assert!(validator.validate(&json!(12), "email").await.is_err());
    }

    #[tokio::test]
    async fn test_uuid() {
        let validator = UuidValidator::new();
        assert!(validator
            .validate(&json!("3fa85f64-5717-4562-b3fc-2c963f66afa6"), "owner")
            .await
            .is_ok());

        let errors = validator.validate(&json!("nope"), "owner").await.unwrap_err();
        assert_eq!(errors.first("owner"), Some("The owner must be a valid UUID."));
    }

    #[tokio::test]
    async fn test_pattern() {
        let validator = PatternValidator::new("^[A-Z]{3}$").unwrap();
        assert!(validator.validate(&json!("ABC"), "code").await.is_ok());
        assert!(validator.validate(&json!("abc"), "code").await.is_err());
        assert!(PatternValidator::new("(").is_err());
    }
}
