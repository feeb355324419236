//! # restful - resource models for REST APIs
//!
//! Umbrella package over the model layer ([`orm`]) and rule-based payload
//! validation ([`validation`]), plus environment configuration and logging
//! setup for applications built on them.

pub use restful_orm as orm;
pub use restful_validation as validation;

pub use restful_orm::{
    transform_collection, transform_model, Attributes, BaseTransformer, KeyCase, MemoryStore,
    ModelConfig, ModelError, ModelId, ModelIds, ModelLifecycle, ModelObserver, ModelResult,
    PgStore, Repository, RestfulModel, RestfulQuery, Store, TransformContext, TransformOptions,
    Transformer,
};
pub use restful_validation::{RuleSet, ValidationErrors, ValidationMessages};

pub mod config;
pub mod logging;
pub mod prelude;

pub use config::{ConfigError, RestfulConfig};
pub use logging::{init_logging, LoggingConfig};

/// Current version of the package
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> &'static str {
    VERSION
}
