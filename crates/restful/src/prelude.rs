//! Common imports for application models
//!
//! ```ignore
//! use restful::prelude::*;
//! ```

pub use crate::config::RestfulConfig;
pub use restful_orm::{
    Attributes, MemoryStore, ModelError, ModelId, ModelIds, ModelLifecycle, ModelObserver,
    ModelResult, PgStore, Repository, RestfulModel, Store, TransformOptions, Transformer,
};
pub use restful_validation::{RuleSet, ValidationMessages};

pub use async_trait::async_trait;
pub use serde_json::{json, Map, Value};
