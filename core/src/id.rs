//! Identity type for markers.
//!
//! A marker is addressed by the resource it is attached to plus a numeric
//! id allocated by the store. Keys are:
//! - Unique within a store
//! - Immutable once assigned
//! - Never reused after the marker is deleted

use std::fmt;

/// Stable key of one marker record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerKey {
    resource: String,
    id: u64,
}

impl MarkerKey {
    /// Create a key from a resource path and a raw marker id.
    pub fn new(resource: impl Into<String>, id: u64) -> Self {
        Self {
            resource: resource.into(),
            id,
        }
    }

    /// The resource path the marker is attached to.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Get the raw id.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for MarkerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.resource, self.id)
    }
}
