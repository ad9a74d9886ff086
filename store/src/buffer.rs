//! Undo log for tracking the pre-transaction state of touched markers.

use std::collections::HashMap;

use mark_core::{Marker, MarkerKey};

/// Records, for each marker touched inside a transaction, what it looked
/// like before the transaction began.
///
/// Only the first touch of a key is recorded; later writes to the same
/// marker within the transaction do not overwrite the original.
#[derive(Debug, Clone, Default)]
pub struct UndoLog {
    /// Original state per key: `None` means the marker did not exist.
    originals: HashMap<MarkerKey, Option<Marker>>,
    /// Keys in first-touch order.
    order: Vec<MarkerKey>,
}

impl UndoLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `original` as the pre-transaction state of `key`, unless
    /// the key was already touched.
    pub fn track(&mut self, key: &MarkerKey, original: Option<&Marker>) {
        if self.originals.contains_key(key) {
            return;
        }
        self.originals.insert(key.clone(), original.cloned());
        self.order.push(key.clone());
    }

    /// Number of touched markers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if nothing was touched.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drain the originals, most recently first-touched first.
    pub fn drain_reverse(&mut self) -> Vec<(MarkerKey, Option<Marker>)> {
        let mut restored = Vec::with_capacity(self.order.len());
        while let Some(key) = self.order.pop() {
            if let Some(original) = self.originals.remove(&key) {
                restored.push((key, original));
            }
        }
        restored
    }

    /// Forget everything (on commit).
    pub fn clear(&mut self) {
        self.originals.clear();
        self.order.clear();
    }
}
