//! Catalog resource descriptor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A reservable resource as declared in the catalog file.
///
/// Descriptors are created once at catalog load and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Catalog-unique identifier (e.g. `"desk-1"`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form attributes (floor, capacity, equipment, ...).
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl ResourceDescriptor {
    /// Creates a descriptor without metadata.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            meta: Map::new(),
        }
    }

    /// Adds a metadata attribute.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}
