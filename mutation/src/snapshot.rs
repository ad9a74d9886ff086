//! Attribute snapshots and merge policy.

use mark_core::{Attributes, MarkerKey};

/// How a new attribute set combines with a marker's existing map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// New values overwrite or add; attributes not mentioned are kept.
    #[default]
    Merge,
    /// The map becomes exactly the new set.
    Replace,
}

impl MergePolicy {
    /// Build the map to write, given the marker's current map.
    pub fn combine(self, current: &Attributes, incoming: &Attributes) -> Attributes {
        match self {
            MergePolicy::Merge => {
                let mut merged = current.clone();
                merged.extend(incoming.iter().map(|(k, v)| (k.clone(), v.clone())));
                merged
            }
            MergePolicy::Replace => incoming.clone(),
        }
    }
}

/// A marker's attribute map as it was at one instant.
///
/// Read-only once captured.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSnapshot {
    key: MarkerKey,
    attributes: Attributes,
    existed_before: bool,
}

impl AttributeSnapshot {
    /// Capture the attributes of an existing marker.
    pub fn capture(key: MarkerKey, attributes: Attributes) -> Self {
        Self {
            key,
            attributes,
            existed_before: true,
        }
    }

    pub fn key(&self) -> &MarkerKey {
        &self.key
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Whether the marker existed when the snapshot was taken.
    pub fn existed_before(&self) -> bool {
        self.existed_before
    }
}
