//! Core validation trait

use crate::error::ValidationResult;
use async_trait::async_trait;
use serde_json::Value;

/// A compiled rule that checks one field value
#[async_trait]
pub trait ValidationRule: Send + Sync {
    /// Validate a single value
    async fn validate(&self, value: &Value, field: &str) -> ValidationResult<()>;

    /// Rule name, matching the declaration name (`required`, `max`, ...)
    fn rule_name(&self) -> &'static str;
}
