//! Response transformers
//!
//! A transformer shapes a model's attributes into the JSON a REST response
//! returns. Models pick one through [`RestfulModel::transformer`]; those that
//! do not get [`BaseTransformer`].

use convert_case::{Boundary, Case, Casing};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::attributes::Attributes;
use crate::error::ModelError;
use crate::model::{ModelConfig, RestfulModel};

const WORD_BOUNDARIES: [Boundary; 5] = [
    Boundary::Underscore,
    Boundary::Hyphen,
    Boundary::Space,
    Boundary::LowerUpper,
    Boundary::Acronym,
];

fn is_snake_case(key: &str) -> bool {
    !key.chars().any(|c| c.is_ascii_uppercase() || c == '-' || c == ' ')
}

/// Key case of transformed output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyCase {
    #[default]
    Snake,
    Camel,
}

impl KeyCase {
    /// Format one attribute name. Words split on separators and lower-to-upper
    /// transitions only, so digits stay attached (`address_line1`).
    /// Names already in snake case are returned as is in snake mode.
    pub fn apply(&self, key: &str) -> String {
        match self {
            KeyCase::Snake if is_snake_case(key) => key.to_string(),
            KeyCase::Snake => key.with_boundaries(&WORD_BOUNDARIES).to_case(Case::Snake),
            KeyCase::Camel => key.with_boundaries(&WORD_BOUNDARIES).to_case(Case::Camel),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KeyCase::Snake => "snake",
            KeyCase::Camel => "camel",
        }
    }
}

impl FromStr for KeyCase {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snake" | "snake_case" => Ok(KeyCase::Snake),
            "camel" | "camelcase" | "camel_case" => Ok(KeyCase::Camel),
            other => Err(ModelError::Configuration(format!(
                "unknown key case '{}', expected snake or camel",
                other
            ))),
        }
    }
}

/// Response-wide transformation settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
    pub case: KeyCase,
    /// Keep the internal key in output even when the model has a UUID key
    pub expose_primary_key: bool,
}

/// What a transformer knows about the model it is shaping
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    pub config: &'a ModelConfig,
    pub options: &'a TransformOptions,
}

pub trait Transformer: Send + Sync {
    fn transform(&self, attributes: &Attributes, context: &TransformContext<'_>) -> Value;

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// The generic transformer.
///
/// Drops the internal key of models that have a UUID key, drops hidden
/// attributes and formats attribute names in the configured case. Attribute
/// values, nested objects included, are passed through untouched. Attribute
/// order is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseTransformer;

impl BaseTransformer {
    /// Whether an attribute appears in output at all
    pub fn is_visible(attribute: &str, context: &TransformContext<'_>) -> bool {
        let config = context.config;
        if config.is_hidden(attribute) {
            return false;
        }
        !(attribute == config.primary_key
            && config.has_uuid_key()
            && !context.options.expose_primary_key)
    }
}

impl Transformer for BaseTransformer {
    fn transform(&self, attributes: &Attributes, context: &TransformContext<'_>) -> Value {
        let case = context.options.case;
        let mut output = Map::with_capacity(attributes.len());
        for (key, value) in attributes.iter() {
            if Self::is_visible(key, context) {
                output.insert(case.apply(key), value.clone());
            }
        }
        Value::Object(output)
    }

    fn name(&self) -> &'static str {
        "BaseTransformer"
    }
}

/// Shape one model with its own transformer
pub fn transform_model<M: RestfulModel>(model: &M, options: &TransformOptions) -> Value {
    let config = ModelConfig::of::<M>();
    let context = TransformContext {
        config: &config,
        options,
    };
    config.transformer.transform(model.attributes(), &context)
}

/// Shape a list of models into a JSON array
pub fn transform_collection<M: RestfulModel>(models: &[M], options: &TransformOptions) -> Value {
    let config = ModelConfig::of::<M>();
    let context = TransformContext {
        config: &config,
        options,
    };
    Value::Array(
        models
            .iter()
            .map(|model| config.transformer.transform(model.attributes(), &context))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Account {
        attributes: Attributes,
    }

    impl RestfulModel for Account {
        fn table_name() -> &'static str {
            "accounts"
        }

        fn primary_key_name() -> &'static str {
            "account_id"
        }

        fn uuid_key_name() -> Option<&'static str> {
            Some("account_uuid")
        }

        fn hidden_attributes() -> &'static [&'static str] {
            &["password_hash"]
        }

        fn from_attributes(attributes: Attributes) -> Self {
            Self { attributes }
        }

        fn attributes(&self) -> &Attributes {
            &self.attributes
        }

        fn attributes_mut(&mut self) -> &mut Attributes {
            &mut self.attributes
        }
    }

    #[derive(Debug)]
    struct Metric {
        attributes: Attributes,
    }

    struct ValueOnly;

    impl Transformer for ValueOnly {
        fn transform(&self, attributes: &Attributes, _context: &TransformContext<'_>) -> Value {
            attributes.get("value").cloned().unwrap_or(Value::Null)
        }
    }

    impl RestfulModel for Metric {
        fn table_name() -> &'static str {
            "metrics"
        }

        fn uuid_key_name() -> Option<&'static str> {
            None
        }

        fn transformer() -> Option<Arc<dyn Transformer>> {
            Some(Arc::new(ValueOnly))
        }

        fn from_attributes(attributes: Attributes) -> Self {
            Self { attributes }
        }

        fn attributes(&self) -> &Attributes {
            &self.attributes
        }

        fn attributes_mut(&mut self) -> &mut Attributes {
            &mut self.attributes
        }
    }

    fn account() -> Account {
        Account::from_attributes(
            Attributes::from_value(json!({
                "account_uuid": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                "display_name": "Ada",
                "password_hash": "x",
                "billing_address": {"postal_code": "12345"},
                "account_id": 5
            }))
            .unwrap(),
        )
    }

    #[test]
    fn test_base_transformer_hides_internal_key() {
        let output = transform_model(&account(), &TransformOptions::default());
        let keys: Vec<&String> = output.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["account_uuid", "display_name", "billing_address"]);
    }

    #[test]
    fn test_expose_primary_key() {
        let options = TransformOptions {
            expose_primary_key: true,
            ..Default::default()
        };
        let output = transform_model(&account(), &options);
        assert_eq!(output["account_id"], json!(5));
        assert!(output.get("password_hash").is_none());
    }

    #[test]
    fn test_camel_case_leaves_values_alone() {
        let options = TransformOptions {
            case: KeyCase::Camel,
            ..Default::default()
        };
        let output = transform_model(&account(), &options);
        assert_eq!(output["accountUuid"], json!("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
        assert_eq!(output["billingAddress"], json!({"postal_code": "12345"}));
    }

    #[test]
    fn test_snake_keys_with_digits_survive_defaults() {
        let mut account = account();
        account.set_attribute("address_line1", "1 Main St");
        account.set_attribute("sha256", "abc");
        account.set_attribute("_meta", json!({"innerKey": 1}));

        let output = transform_model(&account, &TransformOptions::default());
        assert_eq!(output["address_line1"], json!("1 Main St"));
        assert_eq!(output["sha256"], json!("abc"));
        assert_eq!(output["_meta"], json!({"innerKey": 1}));
        assert!(output.get("address_line_1").is_none());
        assert!(output.get("sha_256").is_none());
    }

    #[test]
    fn test_key_case_boundaries() {
        assert_eq!(KeyCase::Camel.apply("address_line1"), "addressLine1");
        assert_eq!(KeyCase::Camel.apply("sha256"), "sha256");
        assert_eq!(KeyCase::Snake.apply("addressLine1"), "address_line1");
        assert_eq!(KeyCase::Snake.apply("userUuid"), "user_uuid");
        assert_eq!(KeyCase::Snake.apply("user_uuid"), "user_uuid");
    }

    #[test]
    fn test_default_and_custom_transformer_lookup() {
        assert_eq!(Account::get_transformer().name(), "BaseTransformer");
        assert_ne!(Metric::get_transformer().name(), "BaseTransformer");

        let metrics = vec![
            Metric::from_attributes(Attributes::new().with("value", 1)),
            Metric::from_attributes(Attributes::new().with("value", 2)),
        ];
        let output = transform_collection(&metrics, &TransformOptions::default());
        assert_eq!(output, json!([1, 2]));
    }

    #[test]
    fn test_key_case_parsing() {
        assert_eq!("camel".parse::<KeyCase>().unwrap(), KeyCase::Camel);
        assert_eq!(" Snake ".parse::<KeyCase>().unwrap(), KeyCase::Snake);
        assert!("kebab".parse::<KeyCase>().is_err());
    }
}
