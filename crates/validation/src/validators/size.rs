//! `min` / `max` validators
//!
//! What gets measured depends on the value: character count for strings,
//! element count for arrays and objects, and the value itself for numbers or
//! for numeric strings when the field is declared `integer` or `numeric`.

use crate::error::{ValidationError, ValidationResult};
use crate::messages::{format_bound, render};
use crate::traits::ValidationRule;
use super::types::parse_finite;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeBound {
    Min(f64),
    Max(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Measured {
    Number(f64),
    Characters(f64),
    Items(f64),
}

#[derive(Debug, Clone)]
pub struct SizeValidator {
    pub bound: SizeBound,
    /// Treat string values as numbers
    pub numeric: bool,
    pub message: Option<String>,
}

impl SizeValidator {
    pub fn min(min: f64) -> Self {
        Self {
            bound: SizeBound::Min(min),
            numeric: false,
            message: None,
        }
    }

    pub fn max(max: f64) -> Self {
        Self {
            bound: SizeBound::Max(max),
            numeric: false,
            message: None,
        }
    }

    pub fn numeric(mut self, numeric: bool) -> Self {
        self.numeric = numeric;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn measure(&self, value: &Value) -> Option<Measured> {
        match value {
            Value::Number(n) => n.as_f64().map(Measured::Number),
            Value::String(s) if self.numeric => parse_finite(s).map(Measured::Number),
            Value::String(s) => Some(Measured::Characters(s.chars().count() as f64)),
            Value::Array(arr) => Some(Measured::Items(arr.len() as f64)),
            Value::Object(obj) => Some(Measured::Items(obj.len() as f64)),
            // Null and booleans have no size; type rules report those
            _ => None,
        }
    }

    fn default_message(&self, measured: Measured) -> &'static str {
        match (self.bound, measured) {
            (SizeBound::Min(_), Measured::Number(_)) => "The :attribute must be at least :min.",
            (SizeBound::Min(_), Measured::Characters(_)) => {
                "The :attribute must be at least :min characters."
            }
            (SizeBound::Min(_), Measured::Items(_)) => "The :attribute must have at least :min items.",
            (SizeBound::Max(_), Measured::Number(_)) => {
                "The :attribute may not be greater than :max."
            }
            (SizeBound::Max(_), Measured::Characters(_)) => {
                "The :attribute may not be greater than :max characters."
            }
            (SizeBound::Max(_), Measured::Items(_)) => {
                "The :attribute may not have more than :max items."
            }
        }
    }
}

#[async_trait]
impl ValidationRule for SizeValidator {
    async fn validate(&self, value: &Value, field: &str) -> ValidationResult<()> {
        let Some(measured) = self.measure(value) else {
            return Ok(());
        };
        let size = match measured {
            Measured::Number(v) | Measured::Characters(v) | Measured::Items(v) => v,
        };

        let (passes, params) = match self.bound {
            SizeBound::Min(min) => (size >= min, [(":min", format_bound(min))]),
            SizeBound::Max(max) => (size <= max, [(":max", format_bound(max))]),
        };
        if passes {
            return Ok(());
        }

        let template = self
            .message
            .as_deref()
            .unwrap_or_else(|| self.default_message(measured));
        Err(ValidationError::for_rule(field, render(template, field, &params), self.rule_name()).into())
    }

    fn rule_name(&self) -> &'static str {
        match self.bound {
            SizeBound::Min(_) => "min",
            SizeBound::Max(_) => "max",
        }
    }
}
