//! Entity (node) in the snapshot view model.

use serde::{Deserialize, Serialize};
use super::{PropertyMap, Value};

/// Canonical string identity of a graph element.
///
/// Sources report identities as native integers, strings, or opaque
/// element ids; all of them are normalized to one string form here so
/// that equality across triples is well-defined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self { Self(s) }
}
impl From<&str> for ElementId {
    fn from(s: &str) -> Self { Self(s.to_owned()) }
}
impl From<u64> for ElementId {
    fn from(n: u64) -> Self { Self(n.to_string()) }
}
impl From<i64> for ElementId {
    fn from(n: i64) -> Self { Self(n.to_string()) }
}

impl ElementId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A de-duplicated entity record, ready for a rendering layer.
///
/// `size` and `color` are presentation slots: the snapshot builder never
/// fills them, a styling pass between builder and widget may.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: ElementId,
    /// Primary category label (first label reported by the source).
    pub label: String,
    pub properties: PropertyMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Entity {
    pub fn new(id: impl Into<ElementId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            properties: PropertyMap::new(),
            size: None,
            color: None,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Property rendered as display text, if present.
    pub fn display(&self, key: &str) -> Option<String> {
        self.properties.get(key).map(|v| v.to_string())
    }
}
