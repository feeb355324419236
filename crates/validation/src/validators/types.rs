//! Value type validators: `string`, `integer`, `numeric`, `boolean`

use crate::error::{ValidationError, ValidationResult};
use crate::messages::render;
use crate::traits::ValidationRule;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Integer,
    Numeric,
    Boolean,
}

impl ValueType {
    fn default_message(&self) -> &'static str {
        match self {
            ValueType::String => "The :attribute must be a string.",
            ValueType::Integer => "The :attribute must be an integer.",
            ValueType::Numeric => "The :attribute must be a number.",
            ValueType::Boolean => "The :attribute field must be true or false.",
        }
    }

    /// Form-encoded payloads carry numbers and flags as strings, so numeric
    /// and boolean checks accept their string spellings too.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueType::String, Value::String(_)) => true,
            (ValueType::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (ValueType::Integer, Value::String(s)) => s.trim().parse::<i64>().is_ok(),
            (ValueType::Numeric, Value::Number(_)) => true,
            (ValueType::Numeric, Value::String(s)) => parse_finite(s).is_some(),
            (ValueType::Boolean, Value::Bool(_)) => true,
            (ValueType::Boolean, Value::Number(n)) => matches!(n.as_i64(), Some(0) | Some(1)),
            (ValueType::Boolean, Value::String(s)) => matches!(s.as_str(), "0" | "1"),
            _ => false,
        }
    }

    fn rule_name(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Numeric => "numeric",
            ValueType::Boolean => "boolean",
        }
    }
}

/// A numeric string as a finite number; `NaN` and infinities are not numbers
pub(crate) fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[derive(Debug, Clone)]
pub struct TypeValidator {
    pub expected: ValueType,
    pub message: Option<String>,
}

impl TypeValidator {
    pub fn new(expected: ValueType) -> Self {
        Self {
            expected,
            message: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[async_trait]
impl ValidationRule for TypeValidator {
    async fn validate(&self, value: &Value, field: &str) -> ValidationResult<()> {
        if self.expected.matches(value) {
            return Ok(());
        }
        let template = self
            .message
            .as_deref()
            .unwrap_or_else(|| self.expected.default_message());
        Err(ValidationError::for_rule(field, render(template, field, &[]), self.rule_name()).into())
    }

    fn rule_name(&self) -> &'static str {
        self.expected.rule_name()
    }
}
