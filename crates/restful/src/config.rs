//! Environment configuration
//!
//! | variable | default |
//! |---|---|
//! | `RESTFUL_RESPONSE_CASE` | `snake` |
//! | `RESTFUL_EXPOSE_PRIMARY_KEY` | `false` |
//! | `RESTFUL_LOG_LEVEL` | `info` |
//! | `RESTFUL_LOG_JSON` | `false` |

use std::env;

use restful_orm::{KeyCase, TransformOptions};

use crate::logging::LoggingConfig;

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },
}

impl ConfigError {
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestfulConfig {
    /// Key case of transformed responses
    pub response_case: KeyCase,
    /// Keep internal keys in responses of models that have a UUID key
    pub expose_primary_key: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for RestfulConfig {
    fn default() -> Self {
        Self {
            response_case: KeyCase::Snake,
            expose_primary_key: false,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl RestfulConfig {
    /// Load from `RESTFUL_*` environment variables; unset ones keep defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(case) = env::var("RESTFUL_RESPONSE_CASE") {
            config.response_case = case
                .parse()
                .map_err(|_| ConfigError::invalid_value("response_case", case, "snake or camel"))?;
        }

        if let Ok(expose) = env::var("RESTFUL_EXPOSE_PRIMARY_KEY") {
            config.expose_primary_key = parse_bool("expose_primary_key", &expose)?;
        }

        if let Ok(level) = env::var("RESTFUL_LOG_LEVEL") {
            config.log_level = level.trim().to_lowercase();
        }

        if let Ok(json) = env::var("RESTFUL_LOG_JSON") {
            config.log_json = parse_bool("log_json", &json)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::invalid_value(
                "log_level",
                self.log_level.clone(),
                format!("one of: {}", VALID_LOG_LEVELS.join(", ")),
            ));
        }
        Ok(())
    }

    /// Options handed to transformers when shaping responses
    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            case: self.response_case,
            expose_primary_key: self.expose_primary_key,
        }
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            json_format: self.log_json,
            ..LoggingConfig::default()
        }
    }
}

fn parse_bool(field: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::invalid_value(field, raw, "a boolean (true/false)")),
    }
}
