//! Repository - persistence flows for one resource model type
//!
//! The repository is where the lifecycle hooks run: creation goes through the
//! registered observers exactly once, before the insert, and deletion accepts
//! internal and external identifiers alike.

use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

use super::builder::{RestfulQuery, Table};
use crate::attributes::Attributes;
use crate::error::{ModelError, ModelResult};
use crate::identifier::{ModelId, ModelIds};
use crate::model::{ModelLifecycle, RestfulModel};
use crate::store::Store;

const CREATED_AT: &str = "created_at";
const UPDATED_AT: &str = "updated_at";
const DELETED_AT: &str = "deleted_at";

fn now() -> Value {
    Value::String(chrono::Utc::now().to_rfc3339())
}

pub struct Repository<M: RestfulModel> {
    store: Arc<dyn Store>,
    lifecycle: ModelLifecycle<M>,
}

impl<M: RestfulModel> Repository<M> {
    /// Repository with the default lifecycle (UUID creation hook registered)
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_lifecycle(store, ModelLifecycle::with_defaults())
    }

    pub fn with_lifecycle(store: Arc<dyn Store>, lifecycle: ModelLifecycle<M>) -> Self {
        Self { store, lifecycle }
    }

    pub fn lifecycle(&self) -> &ModelLifecycle<M> {
        &self.lifecycle
    }

    pub fn lifecycle_mut(&mut self) -> &mut ModelLifecycle<M> {
        &mut self.lifecycle
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Base query over the model's visible rows
    pub fn query(&self) -> RestfulQuery {
        RestfulQuery::for_model::<M>()
    }

    /// Persist a new model. The creating observers run once, before the
    /// insert; the returned model carries the stored attributes, internal key
    /// included.
    pub async fn create(&self, mut model: M) -> ModelResult<M> {
        self.lifecycle.trigger_creating(&mut model).await?;

        if M::uses_timestamps() {
            let stamp = now();
            let attributes = model.attributes_mut();
            for column in [CREATED_AT, UPDATED_AT] {
                if !attributes.contains(column) {
                    attributes.set(column, stamp.clone());
                }
            }
        }

        let stored = self
            .store
            .insert(&Table::of::<M>(), model.attributes().clone())
            .await?;
        let model = M::from_attributes(stored);

        self.lifecycle.trigger_created(&model).await?;
        tracing::info!(
            table = M::table_name(),
            key = model.primary_key(),
            "created resource"
        );
        Ok(model)
    }

    /// Create from an API payload: validate with the create rules, persist,
    /// then put the UUID first for the response
    pub async fn create_from(&self, payload: Map<String, Value>) -> ModelResult<M> {
        let model = M::from_attributes(Attributes::from(payload.clone()));
        model.validate_for_create(&payload).await?;

        let mut model = self.create(model).await?;
        model.order_attributes_uuid_first();
        Ok(model)
    }

    /// Apply an API update payload. Immutable attributes are rejected before
    /// validation runs.
    pub async fn update(&self, mut model: M, payload: Map<String, Value>) -> ModelResult<M> {
        model.guard_update(&payload)?;
        model.validate_for_update(&payload).await?;
        model.fill(payload);
        self.save(model).await
    }

    /// Persist the model's current attributes as they are. For internal
    /// writes, which may change immutable attributes.
    pub async fn save(&self, mut model: M) -> ModelResult<M> {
        let key = model.primary_key().ok_or(ModelError::MissingPrimaryKey)?;
        self.lifecycle.trigger_updating(&mut model).await?;

        if M::uses_timestamps() {
            model.set_attribute(UPDATED_AT, now());
        }

        let mut changes = model.attributes().clone();
        changes.remove(M::primary_key_name());
        let updated = self
            .store
            .update(&self.query().where_key(key), &changes)
            .await?;
        if updated == 0 {
            return Err(ModelError::NotFound(format!("{} {}", M::table_name(), key)));
        }

        self.lifecycle.trigger_updated(&model).await?;
        tracing::debug!(table = M::table_name(), key, "updated resource");
        Ok(model)
    }

    /// Look a model up by either identifier form
    pub async fn find(&self, id: impl Into<ModelId>) -> ModelResult<Option<M>> {
        let query = match id.into() {
            ModelId::Internal(key) => self.query().where_key(key),
            ModelId::External(uuid) => match M::uuid_key_name() {
                Some(column) => self.query().where_uuid(column, uuid),
                None => return Ok(None),
            },
        };

        let mut rows = self.store.select(&query).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(M::from_attributes(rows.swap_remove(0)))
        })
    }

    pub async fn find_or_fail(&self, id: impl Into<ModelId>) -> ModelResult<M> {
        let id = id.into();
        self.find(id)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("{} {}", M::table_name(), id)))
    }

    pub async fn find_by_uuid(&self, uuid: Uuid) -> ModelResult<Option<M>> {
        self.find(ModelId::External(uuid)).await
    }

    /// Every visible model, ordered by internal key
    pub async fn all(&self) -> ModelResult<Vec<M>> {
        let rows = self.store.select(&self.query()).await?;
        Ok(rows.into_iter().map(M::from_attributes).collect())
    }

    /// Delete by internal keys, UUIDs, or a mix of both. Each identifier is
    /// classified on its own; unknown identifiers delete nothing. Returns the
    /// number of models deleted.
    pub async fn destroy(&self, ids: impl Into<ModelIds>) -> ModelResult<u64> {
        let ids = ids.into();
        if ids.is_empty() {
            return Ok(0);
        }

        let keys = self.resolve_keys(&ids).await?;
        if keys.is_empty() {
            tracing::debug!(table = M::table_name(), requested = ids.len(), "nothing to destroy");
            return Ok(0);
        }

        let rows = self.store.select(&self.query().where_key_in(&keys)).await?;
        let mut count = 0;
        for row in rows {
            let model = M::from_attributes(row);
            count += self.delete_model(&model).await?;
        }

        tracing::info!(
            table = M::table_name(),
            requested = ids.len(),
            deleted = count,
            "destroyed resources"
        );
        Ok(count)
    }

    pub async fn destroy_by_uuid(&self, uuids: &[Uuid]) -> ModelResult<u64> {
        self.destroy(uuids.to_vec()).await
    }

    /// Destroy by a raw identifier from a request path. A string that is
    /// neither a canonical UUID nor an integer matches no row.
    pub async fn destroy_str(&self, raw: &str) -> ModelResult<u64> {
        match ModelId::classify(raw) {
            Ok(id) => self.destroy(id).await,
            Err(err) => {
                tracing::warn!(table = M::table_name(), %err, "identifier matches no row");
                Ok(0)
            }
        }
    }

    /// Internal keys for the given identifiers, UUIDs resolved through the
    /// store
    async fn resolve_keys(&self, ids: &ModelIds) -> ModelResult<Vec<i64>> {
        let (mut keys, uuids) = ids.partition();

        if !uuids.is_empty() {
            match M::uuid_key_name() {
                Some(column) => {
                    let resolved = self
                        .store
                        .pluck_keys(&self.query().where_uuid_in(column, &uuids))
                        .await?;
                    tracing::debug!(
                        table = M::table_name(),
                        uuids = uuids.len(),
                        resolved = resolved.len(),
                        "resolved external identifiers"
                    );
                    keys.extend(resolved);
                }
                None => {
                    tracing::debug!(table = M::table_name(), "model has no uuid key, external ids ignored");
                }
            }
        }

        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }

    async fn delete_model(&self, model: &M) -> ModelResult<u64> {
        let key = model.primary_key().ok_or(ModelError::MissingPrimaryKey)?;
        self.lifecycle.trigger_deleting(model).await?;

        let query = self.query().where_key(key);
        let removed = if M::uses_soft_deletes() {
            let changes = Attributes::new().with(DELETED_AT, now());
            self.store.update(&query, &changes).await?
        } else {
            self.store.delete(&query).await?
        };

        if removed > 0 {
            self.lifecycle.trigger_deleted(model).await?;
        }
        Ok(removed)
    }
}
