//! # restful-orm: resource models for REST APIs
//!
//! Concrete domain models implement [`RestfulModel`] and get consistent API
//! behaviour from it:
//!
//! - an internal auto-incrementing key plus an external UUID key that is
//!   generated on creation when the caller did not supply one;
//! - deletion that accepts either identifier form ([`ModelId`]);
//! - immutable attributes that external update requests may not touch;
//! - create/update validation rules and custom messages;
//! - a per-model [`Transformer`] with a generic default.
//!
//! Storage goes through the [`Store`] trait; [`MemoryStore`] and [`PgStore`]
//! are provided.

pub mod attributes;
pub mod error;
pub mod identifier;
pub mod model;
pub mod query;
pub mod store;
pub mod transformer;

// Re-export core traits and types
pub use attributes::Attributes;
pub use error::{ModelError, ModelResult};
pub use identifier::{generate_external_id, generate_external_id_string, is_external_id, ModelId, ModelIds};
pub use model::{ModelConfig, ModelLifecycle, ModelObserver, RestfulModel, UuidKeyObserver};
pub use query::{Condition, Repository, RestfulQuery, Table};
pub use store::{MemoryStore, PgStore, Store};
pub use transformer::{
    transform_collection, transform_model, BaseTransformer, KeyCase, TransformContext,
    TransformOptions, Transformer,
};

pub use restful_validation as validation;
