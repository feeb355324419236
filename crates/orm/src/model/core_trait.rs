//! Core Model Trait - Base definition for REST resource models
//!
//! A concrete model declares its table, keys, immutable attributes and
//! validation rules; everything else (UUID generation, attribute ordering,
//! update guarding, transformer lookup) comes from the default methods.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::sync::Arc;
use uuid::Uuid;

use restful_validation::{RuleSet, ValidationErrors, ValidationMessages, Validator};

use crate::attributes::Attributes;
use crate::error::{ModelError, ModelResult};
use crate::identifier::generate_external_id_string;
use crate::transformer::{BaseTransformer, Transformer};

/// Core trait for REST resource models
#[async_trait]
pub trait RestfulModel: Send + Sync + Debug + Sized + 'static {
    /// Table name for this model
    fn table_name() -> &'static str;

    /// Auto-incrementing integer key
    fn primary_key_name() -> &'static str {
        "id"
    }

    /// External UUID key returned to API consumers. `None` for high-volume
    /// records that consumers never address individually.
    fn uuid_key_name() -> Option<&'static str> {
        Some("uuid")
    }

    /// Attributes external update requests may not change, in addition to
    /// the primary and UUID keys. Internal code can still write them.
    fn immutable_attributes() -> &'static [&'static str] {
        &["created_at", "deleted_at"]
    }

    /// Relations to eager-load only for direct single-resource requests
    fn local_with() -> &'static [&'static str] {
        &[]
    }

    /// Attributes never included in transformed output
    fn hidden_attributes() -> &'static [&'static str] {
        &[]
    }

    /// Deletion sets `deleted_at` instead of removing the row
    fn uses_soft_deletes() -> bool {
        false
    }

    /// Maintain `created_at` / `updated_at`
    fn uses_timestamps() -> bool {
        false
    }

    /// Custom transformer for this model, if the default is not enough
    fn transformer() -> Option<Arc<dyn Transformer>> {
        None
    }

    /// The configured transformer, or the generic one
    fn get_transformer() -> Arc<dyn Transformer> {
        Self::transformer().unwrap_or_else(|| Arc::new(BaseTransformer))
    }

    /// Hydrate a model from stored or submitted attributes
    fn from_attributes(attributes: Attributes) -> Self;

    fn attributes(&self) -> &Attributes;

    fn attributes_mut(&mut self) -> &mut Attributes;

    /// Validation rules applied when creating the resource
    fn validation_rules(&self) -> RuleSet {
        RuleSet::new()
    }

    /// Validation rules applied when updating; the create rules unless
    /// overridden
    fn validation_rules_updating(&self) -> RuleSet {
        self.validation_rules()
    }

    /// Custom validation messages keyed by `rule` or `field.rule`
    fn validation_messages(&self) -> ValidationMessages {
        ValidationMessages::new()
    }

    fn get_attribute(&self, key: &str) -> Option<&Value> {
        self.attributes().get(key)
    }

    fn set_attribute(&mut self, key: &str, value: impl Into<Value>) {
        self.attributes_mut().set(key, value);
    }

    /// Internal key, once persisted
    fn primary_key(&self) -> Option<i64> {
        self.get_attribute(Self::primary_key_name())
            .and_then(Value::as_i64)
    }

    fn is_persisted(&self) -> bool {
        self.primary_key().is_some()
    }

    /// External key, if declared and present
    fn uuid_key(&self) -> Option<Uuid> {
        let name = Self::uuid_key_name()?;
        self.get_attribute(name)
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
    }

    /// Creation hook body: assign a fresh UUID when the attribute is absent.
    /// A value already present, whatever it is, is left alone.
    fn ensure_uuid_key(&mut self) -> Option<String> {
        let name = Self::uuid_key_name()?;
        if self.attributes().contains(name) {
            return None;
        }
        let uuid = generate_external_id_string();
        self.set_attribute(name, uuid.clone());
        tracing::debug!(table = Self::table_name(), key = name, %uuid, "generated uuid key");
        Some(uuid)
    }

    /// Move the UUID attribute to the front of the in-memory ordering so that
    /// serialized responses lead with it. Storage is untouched.
    fn order_attributes_uuid_first(&mut self) {
        if let Some(name) = Self::uuid_key_name() {
            self.attributes_mut().move_to_front(name);
        }
    }

    /// Primary key, UUID key and declared immutable attributes
    fn all_immutable_attributes() -> Vec<&'static str> {
        let mut names = vec![Self::primary_key_name()];
        names.extend(Self::uuid_key_name());
        for name in Self::immutable_attributes() {
            if !names.contains(name) {
                names.push(name);
            }
        }
        names
    }

    /// Reject an external update payload that touches immutable attributes
    fn guard_update(&self, payload: &Map<String, Value>) -> ModelResult<()> {
        let mut errors = ValidationErrors::new();
        for name in Self::all_immutable_attributes() {
            if payload.contains_key(name) {
                errors.add(restful_validation::ValidationError::for_rule(
                    name,
                    format!("The {} attribute cannot be updated.", name.replace('_', " ")),
                    "immutable",
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!(
                table = Self::table_name(),
                fields = errors.len(),
                "update payload touches immutable attributes"
            );
            Err(ModelError::Validation(errors))
        }
    }

    /// Copy payload values into the model
    fn fill(&mut self, payload: Map<String, Value>) {
        for (key, value) in payload {
            self.attributes_mut().set(key, value);
        }
    }

    /// Run the create rules against a request payload
    async fn validate_for_create(&self, payload: &Map<String, Value>) -> ModelResult<()> {
        let validator = Validator::compile(&self.validation_rules(), &self.validation_messages())?;
        validator.validate(payload).await.map_err(ModelError::from)
    }

    /// Run the update rules against a request payload
    async fn validate_for_update(&self, payload: &Map<String, Value>) -> ModelResult<()> {
        let validator =
            Validator::compile(&self.validation_rules_updating(), &self.validation_messages())?;
        validator.validate(payload).await.map_err(ModelError::from)
    }
}
