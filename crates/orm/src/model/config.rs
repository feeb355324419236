//! Per-model configuration record
//!
//! Captures a model type's static declarations once so that generic code (a
//! REST controller layer, transformers, stores) can take them by reference
//! instead of being generic over the model.

use std::sync::Arc;

use crate::model::core_trait::RestfulModel;
use crate::query::Table;
use crate::transformer::Transformer;

#[derive(Clone)]
pub struct ModelConfig {
    pub table: &'static str,
    pub primary_key: &'static str,
    pub uuid_key: Option<&'static str>,
    /// Primary key, UUID key and declared immutable attributes
    pub immutable_attributes: Vec<&'static str>,
    pub local_with: &'static [&'static str],
    pub hidden_attributes: &'static [&'static str],
    pub soft_deletes: bool,
    pub timestamps: bool,
    pub transformer: Arc<dyn Transformer>,
}

impl ModelConfig {
    pub fn of<M: RestfulModel>() -> Self {
        Self {
            table: M::table_name(),
            primary_key: M::primary_key_name(),
            uuid_key: M::uuid_key_name(),
            immutable_attributes: M::all_immutable_attributes(),
            local_with: M::local_with(),
            hidden_attributes: M::hidden_attributes(),
            soft_deletes: M::uses_soft_deletes(),
            timestamps: M::uses_timestamps(),
            transformer: M::get_transformer(),
        }
    }

    pub fn table(&self) -> Table {
        Table::new(self.table, self.primary_key)
    }

    pub fn is_immutable(&self, attribute: &str) -> bool {
        self.immutable_attributes.contains(&attribute)
    }

    pub fn is_hidden(&self, attribute: &str) -> bool {
        self.hidden_attributes.contains(&attribute)
    }

    pub fn has_uuid_key(&self) -> bool {
        self.uuid_key.is_some()
    }
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("table", &self.table)
            .field("primary_key", &self.primary_key)
            .field("uuid_key", &self.uuid_key)
            .field("immutable_attributes", &self.immutable_attributes)
            .field("local_with", &self.local_with)
            .field("hidden_attributes", &self.hidden_attributes)
            .field("soft_deletes", &self.soft_deletes)
            .field("timestamps", &self.timestamps)
            .field("transformer", &self.transformer.name())
            .finish()
    }
}
