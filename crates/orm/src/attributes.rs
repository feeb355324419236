//! Ordered attribute storage for model instances
//!
//! Attribute order is what serialization sees, so it is preserved exactly:
//! new attributes are appended, updates keep their slot.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ModelError, ModelResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Map<String, Value>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object
    pub fn from_value(value: Value) -> ModelResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ModelError::Serialization(format!(
                "expected an object of attributes, got {}",
                other
            ))),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set an attribute; existing keys keep their position
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Remove an attribute, keeping the order of the remaining ones
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.0.get(key).cloned()?;
        self.0 = std::mem::take(&mut self.0)
            .into_iter()
            .filter(|(k, _)| k != key)
            .collect();
        Some(removed)
    }

    /// Copy every entry of `other` into this set
    pub fn merge(&mut self, other: Attributes) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Move `key` to the first position. Every other attribute keeps its value
    /// and relative order. Returns false when the key is absent.
    pub fn move_to_front(&mut self, key: &str) -> bool {
        let Some(value) = self.0.get(key).cloned() else {
            return false;
        };
        if self.0.keys().next().map(String::as_str) == Some(key) {
            return true;
        }

        let mut reordered = Map::with_capacity(self.0.len());
        reordered.insert(key.to_string(), value);
        for (k, v) in std::mem::take(&mut self.0) {
            if k != key {
                reordered.insert(k, v);
            }
        }
        self.0 = reordered;
        true
    }
}

impl From<Map<String, Value>> for Attributes {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Attributes {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
