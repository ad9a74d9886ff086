//! The stored marker record.
//!
//! A marker is a small annotation attached to a resource (a task, a
//! problem, a bookmark) that carries a mutable attribute map.

use crate::{Attributes, MarkerKey, Value};

/// A marker attached to a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Unique key of this marker.
    pub key: MarkerKey,
    /// Marker kind, e.g. `task`, `problem` or `bookmark`.
    pub kind: String,
    /// Write counter, bumped on every attribute change.
    pub version: u64,
    /// Attribute values.
    pub attributes: Attributes,
}

impl Marker {
    /// Create a new marker with the given properties.
    pub fn new(key: MarkerKey, kind: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            key,
            kind: kind.into(),
            version: 1,
            attributes,
        }
    }

    /// Get an attribute value by name.
    pub fn get_attr(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Replace the whole attribute map.
    pub fn replace_attrs(&mut self, attributes: Attributes) {
        self.attributes = attributes;
        self.version += 1;
    }
}
