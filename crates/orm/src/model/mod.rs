//! Model System - resource model trait, per-model configuration and the
//! creation lifecycle
//!
//! - `core_trait`: the `RestfulModel` trait concrete models implement
//! - `config`: `ModelConfig`, the per-type configuration record
//! - `lifecycle`: observers and the UUID creation hook

pub mod config;
pub mod core_trait;
pub mod lifecycle;

pub use config::ModelConfig;
pub use core_trait::RestfulModel;
pub use lifecycle::{ModelLifecycle, ModelObserver, UuidKeyObserver};
