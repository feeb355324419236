//! Logging setup
//!
//! The library layers emit `tracing` events; applications install a
//! subscriber once at startup with [`init_logging`].

use std::io;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "warn")
    pub level: String,
    /// JSON structured output instead of text
    pub json_format: bool,
    /// Multi-line text output for development
    pub pretty_print: bool,
    /// Overrides `level` with a full filter such as "restful_orm=debug,sqlx=warn"
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            pretty_print: false,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            json_format: true,
            pretty_print: false,
            env_filter: Some("restful_orm=info,sqlx=warn".to_string()),
        }
    }

    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            json_format: false,
            pretty_print: true,
            env_filter: Some("restful_orm=debug,restful_validation=debug,sqlx=info".to_string()),
        }
    }

    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// The filter directive in effect
    pub fn filter_directive(&self) -> &str {
        self.env_filter.as_deref().unwrap_or(&self.level)
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured filter. Fails if a subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(config.filter_directive()))?;

    if config.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stdout).json())
            .try_init()?;
    } else if config.pretty_print {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stdout).pretty())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stdout))
            .try_init()?;
    }

    let format = if config.json_format { "json" } else { "text" };
    tracing::info!(target: "restful::logging", level = %config.level, format, "logging initialized");
    Ok(())
}
