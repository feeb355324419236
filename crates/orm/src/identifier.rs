//! Identifier System - internal integer keys and external UUID keys
//!
//! Every resource has an auto-incrementing integer key for joins and ordering
//! and, usually, a UUID that API consumers address it by. [`ModelId`] is the
//! tagged form of "either of those", resolved once at the API boundary.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{ModelError, ModelResult};
use restful_validation::validators::format::is_canonical_uuid;

/// Fresh random (v4) external identifier
pub fn generate_external_id() -> Uuid {
    Uuid::new_v4()
}

/// Fresh external identifier in canonical textual form
pub fn generate_external_id_string() -> String {
    generate_external_id().hyphenated().to_string()
}

/// Whether a string is an external identifier in canonical form
pub fn is_external_id(value: &str) -> bool {
    is_canonical_uuid(value)
}

/// A resource identifier in either form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelId {
    /// Auto-incrementing primary key
    Internal(i64),
    /// External UUID key
    External(Uuid),
}

impl ModelId {
    /// Classify a raw identifier: canonical UUIDs are external, integers are
    /// internal, anything else is rejected. Surrounding whitespace is not
    /// stripped.
    pub fn classify(raw: &str) -> ModelResult<Self> {
        if is_external_id(raw) {
            return Uuid::parse_str(raw)
                .map(ModelId::External)
                .map_err(|e| ModelError::InvalidKey(format!("{}: {}", raw, e)));
        }
        raw.parse::<i64>()
            .map(ModelId::Internal)
            .map_err(|_| ModelError::InvalidKey(format!("'{}' is neither an integer nor a UUID", raw)))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, ModelId::Internal(_))
    }

    pub fn is_external(&self) -> bool {
        matches!(self, ModelId::External(_))
    }

    pub fn as_internal(&self) -> Option<i64> {
        match self {
            ModelId::Internal(id) => Some(*id),
            ModelId::External(_) => None,
        }
    }

    pub fn as_external(&self) -> Option<Uuid> {
        match self {
            ModelId::External(uuid) => Some(*uuid),
            ModelId::Internal(_) => None,
        }
    }

    /// Value as stored in its column
    pub fn to_value(&self) -> Value {
        match self {
            ModelId::Internal(id) => Value::from(*id),
            ModelId::External(uuid) => Value::String(uuid.hyphenated().to_string()),
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelId::Internal(id) => write!(f, "{}", id),
            ModelId::External(uuid) => write!(f, "{}", uuid.hyphenated()),
        }
    }
}

impl FromStr for ModelId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::classify(s)
    }
}

impl From<i64> for ModelId {
    fn from(id: i64) -> Self {
        ModelId::Internal(id)
    }
}

impl From<i32> for ModelId {
    fn from(id: i32) -> Self {
        ModelId::Internal(i64::from(id))
    }
}

impl From<Uuid> for ModelId {
    fn from(uuid: Uuid) -> Self {
        ModelId::External(uuid)
    }
}

impl Serialize for ModelId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ModelId::Internal(id) => serializer.serialize_i64(*id),
            ModelId::External(uuid) => serializer.collect_str(&uuid.hyphenated()),
        }
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        match Value::deserialize(deserializer)? {
            Value::Number(n) => n
                .as_i64()
                .map(ModelId::Internal)
                .ok_or_else(|| D::Error::custom(format!("identifier {} is not an integer", n))),
            Value::String(s) => ModelId::classify(&s).map_err(D::Error::custom),
            other => Err(D::Error::custom(format!("invalid identifier: {}", other))),
        }
    }
}

/// One or many identifiers, each classified on its own
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelIds(Vec<ModelId>);

impl ModelIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify every raw identifier; fails on the first unclassifiable one
    pub fn parse_all<S: AsRef<str>>(raw: &[S]) -> ModelResult<Self> {
        raw.iter()
            .map(|s| ModelId::classify(s.as_ref()))
            .collect::<ModelResult<Vec<_>>>()
            .map(ModelIds)
    }

    pub fn push(&mut self, id: impl Into<ModelId>) {
        self.0.push(id.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelId> {
        self.0.iter()
    }

    /// Split into internal keys and external UUIDs, keeping input order
    pub fn partition(&self) -> (Vec<i64>, Vec<Uuid>) {
        let mut internal = Vec::new();
        let mut external = Vec::new();
        for id in &self.0 {
            match id {
                ModelId::Internal(key) => internal.push(*key),
                ModelId::External(uuid) => external.push(*uuid),
            }
        }
        (internal, external)
    }
}

impl IntoIterator for ModelIds {
    type Item = ModelId;
    type IntoIter = std::vec::IntoIter<ModelId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<ModelId> for ModelIds {
    fn from_iter<I: IntoIterator<Item = ModelId>>(iter: I) -> Self {
        ModelIds(iter.into_iter().collect())
    }
}

impl From<ModelId> for ModelIds {
    fn from(id: ModelId) -> Self {
        ModelIds(vec![id])
    }
}

impl From<i64> for ModelIds {
    fn from(id: i64) -> Self {
        ModelId::from(id).into()
    }
}

impl From<i32> for ModelIds {
    fn from(id: i32) -> Self {
        ModelId::from(id).into()
    }
}

impl From<Uuid> for ModelIds {
    fn from(uuid: Uuid) -> Self {
        ModelId::from(uuid).into()
    }
}

impl From<Vec<ModelId>> for ModelIds {
    fn from(ids: Vec<ModelId>) -> Self {
        ModelIds(ids)
    }
}

impl From<Vec<i64>> for ModelIds {
    fn from(ids: Vec<i64>) -> Self {
        ids.into_iter().map(ModelId::Internal).collect()
    }
}

impl From<Vec<Uuid>> for ModelIds {
    fn from(ids: Vec<Uuid>) -> Self {
        ids.into_iter().map(ModelId::External).collect()
    }
}

impl From<&[i64]> for ModelIds {
    fn from(ids: &[i64]) -> Self {
        ids.iter().copied().map(ModelId::Internal).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UUID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    #[test]
    fn test_generated_ids_are_canonical_and_distinct() {
        let a = generate_external_id_string();
        let b = generate_external_id_string();

        assert!(is_external_id(&a));
        assert_eq!(a.len(), 36);
        assert_eq!(a, a.to_lowercase());
        assert_ne!(a, b);
    }

    #[test]
    fn test_classify() {
        assert_eq!(ModelId::classify("5").unwrap(), ModelId::Internal(5));
        assert_eq!(
            ModelId::classify(UUID).unwrap(),
            ModelId::External(Uuid::parse_str(UUID).unwrap())
        );
        assert_eq!(
            ModelId::classify(&UUID.to_uppercase()).unwrap(),
            ModelId::External(Uuid::parse_str(UUID).unwrap())
        );
    }

    #[test]
    fn test_malformed_identifiers_are_rejected() {
        let padded = format!(" {} ", UUID);
        for raw in [
            "",
            "abc",
            "3fa85f64-5717-4562-b3fc",
            "3fa85f6457174562b3fc2c963f66afa6",
            "1.5",
            " 2 ",
            "2\n",
            padded.as_str(),
        ] {
            assert!(matches!(ModelId::classify(raw), Err(ModelError::InvalidKey(_))), "{}", raw);
        }
    }

    #[test]
    fn test_display_round_trips_through_classify() {
        let external = ModelId::External(Uuid::parse_str(UUID).unwrap());
        assert_eq!(external.to_string(), UUID);
        assert_eq!(external.to_string().parse::<ModelId>().unwrap(), external);
        assert_eq!(ModelId::Internal(42).to_string(), "42");
    }

    #[test]
    fn test_serde_forms() {
        let ids: ModelIds = serde_json::from_str(&format!(r#"[5, "7", "{}"]"#, UUID)).unwrap();
        let (internal, external) = ids.partition();
        assert_eq!(internal, vec![5, 7]);
        assert_eq!(external, vec![Uuid::parse_str(UUID).unwrap()]);

        let json = serde_json::to_value(&ids).unwrap();
        assert_eq!(json, serde_json::json!([5, 7, UUID]));

        assert!(serde_json::from_str::<ModelId>("true").is_err());
        assert!(serde_json::from_str::<ModelId>(r#""nope""#).is_err());
    }

    #[test]
    fn test_mixed_collections_partition_in_order() {
        let ids = ModelIds::parse_all(&["3", UUID, "1"]).unwrap();
        assert_eq!(ids.len(), 3);
        let (internal, external) = ids.partition();
        assert_eq!(internal, vec![3, 1]);
        assert_eq!(external.len(), 1);

        assert!(ModelIds::parse_all(&["3", "x"]).is_err());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(ModelIds::from(5i64).len(), 1);
        assert_eq!(ModelIds::from(vec![1i64, 2, 3]).len(), 3);
        assert!(ModelIds::from(Uuid::new_v4()).iter().all(ModelId::is_external));
        assert_eq!(ModelId::from(9).as_internal(), Some(9));
    }
}
