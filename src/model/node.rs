//! Node in the property graph.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{PropertyMap, Value};
use crate::{Error, Result};

/// Opaque node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Label set. Real-estate nodes carry exactly one label.
pub type Labels = SmallVec<[String; 1]>;

/// A node in the property graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub labels: Labels,
    pub properties: PropertyMap,
}

impl Node {
    pub fn new(
        id: NodeId,
        labels: impl IntoIterator<Item = impl Into<String>>,
        properties: PropertyMap,
    ) -> Self {
        Self {
            id,
            labels: labels.into_iter().map(Into::into).collect(),
            properties,
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Read a string property, failing with a type error if absent or not a string.
    pub fn get_str(&self, key: &str) -> Result<&str> {
        match self.get(key) {
            Some(v) => v.as_str().ok_or_else(|| type_error(key, "STRING", v)),
            None => Err(missing(self.id, key)),
        }
    }

    pub fn get_float(&self, key: &str) -> Result<f64> {
        match self.get(key) {
            Some(v) => v.as_float().ok_or_else(|| type_error(key, "FLOAT", v)),
            None => Err(missing(self.id, key)),
        }
    }

    pub fn get_int(&self, key: &str) -> Result<i64> {
        match self.get(key) {
            Some(v) => v.as_int().ok_or_else(|| type_error(key, "INTEGER", v)),
            None => Err(missing(self.id, key)),
        }
    }
}

fn type_error(key: &str, expected: &str, got: &Value) -> Error {
    Error::TypeError {
        expected: format!("{expected} for property '{key}'"),
        got: got.type_name().into(),
    }
}

fn missing(id: NodeId, key: &str) -> Error {
    Error::TypeError {
        expected: format!("property '{key}' on node {id}"),
        got: "NULL".into(),
    }
}
