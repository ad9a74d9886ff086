//! In-memory marker storage.

use std::collections::BTreeMap;

use mark_core::{Attributes, Marker, MarkerKey, StoreError, StoreResult};

use crate::buffer::UndoLog;
use crate::index::KindIndex;
use crate::store::MarkerStore;

/// Transaction state of a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// No transaction is active.
    Inactive,
    /// Transaction is active.
    Active,
}

/// ID allocator for markers.
///
/// Ids are handed out once and never recycled, so a marker that is
/// deleted and created again always gets a fresh key.
#[derive(Debug)]
struct IdAllocator {
    next_id: u64,
}

impl IdAllocator {
    fn new() -> Self {
        Self { next_id: 1 }
    }

    fn alloc(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// The in-memory marker store.
///
/// Writes outside a transaction apply immediately. Inside a transaction
/// they also apply immediately (read-your-writes) while the undo log keeps
/// the original of every touched marker for rollback.
#[derive(Debug)]
pub struct MarkerWorkspace {
    /// Marker storage, ordered by resource then id
    markers: BTreeMap<MarkerKey, Marker>,
    /// ID allocator
    id_alloc: IdAllocator,
    /// Kind index
    kind_index: KindIndex,
    /// Current transaction state
    state: TransactionState,
    /// Originals of markers touched by the open transaction
    undo_log: UndoLog,
}

impl Default for MarkerWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerWorkspace {
    /// Create a new empty workspace.
    pub fn new() -> Self {
        Self {
            markers: BTreeMap::new(),
            id_alloc: IdAllocator::new(),
            kind_index: KindIndex::new(),
            state: TransactionState::Inactive,
            undo_log: UndoLog::new(),
        }
    }

    /// Get the current transaction state.
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Check if a transaction is active.
    pub fn in_transaction(&self) -> bool {
        self.state == TransactionState::Active
    }

    // ==================== Marker Operations ====================

    /// Create a marker of `kind` on `resource` and return its new key.
    pub fn create_marker(
        &mut self,
        resource: impl Into<String>,
        kind: impl Into<String>,
        attributes: Attributes,
    ) -> MarkerKey {
        let key = MarkerKey::new(resource, self.id_alloc.alloc());
        let marker = Marker::new(key.clone(), kind, attributes);

        if self.in_transaction() {
            self.undo_log.track(&key, None);
        }
        self.insert(marker);
        key
    }

    /// Delete a marker, returning its last state.
    pub fn delete_marker(&mut self, key: &MarkerKey) -> StoreResult<Marker> {
        if self.in_transaction() {
            self.undo_log.track(key, self.markers.get(key));
        }
        self.take(key)
            .ok_or_else(|| StoreError::MarkerNotFound(key.clone()))
    }

    /// Get a marker by key.
    pub fn marker(&self, key: &MarkerKey) -> Option<&Marker> {
        self.markers.get(key)
    }

    /// All markers attached to `resource`, in id order.
    pub fn markers_on<'a>(&'a self, resource: &str) -> impl Iterator<Item = &'a Marker> + 'a {
        let start = MarkerKey::new(resource, 0);
        let end = MarkerKey::new(resource, u64::MAX);
        self.markers.range(start..=end).map(|(_, marker)| marker)
    }

    /// All markers of `kind`, in key order.
    pub fn markers_of_kind<'a>(&'a self, kind: &str) -> impl Iterator<Item = &'a Marker> + 'a {
        self.kind_index
            .get(kind)
            .filter_map(move |key| self.markers.get(key))
    }

    /// Number of stored markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Check if the workspace holds no markers.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    // ==================== Internal Helpers ====================

    fn insert(&mut self, marker: Marker) {
        self.kind_index.insert(&marker.kind, marker.key.clone());
        self.markers.insert(marker.key.clone(), marker);
    }

    fn take(&mut self, key: &MarkerKey) -> Option<Marker> {
        let marker = self.markers.remove(key)?;
        self.kind_index.remove(&marker.kind, key);
        Some(marker)
    }
}

impl MarkerStore for MarkerWorkspace {
    fn exists(&self, key: &MarkerKey) -> bool {
        self.markers.contains_key(key)
    }

    fn get_attributes(&self, key: &MarkerKey) -> StoreResult<Attributes> {
        self.markers
            .get(key)
            .map(|marker| marker.attributes.clone())
            .ok_or_else(|| StoreError::MarkerNotFound(key.clone()))
    }

    fn set_attributes(&mut self, key: &MarkerKey, attributes: Attributes) -> StoreResult<()> {
        let active = self.in_transaction();
        let marker = self
            .markers
            .get_mut(key)
            .ok_or_else(|| StoreError::MarkerNotFound(key.clone()))?;

        if active {
            self.undo_log.track(key, Some(&*marker));
        }
        marker.replace_attrs(attributes);
        Ok(())
    }

    fn begin(&mut self) -> StoreResult<()> {
        if self.state == TransactionState::Active {
            return Err(StoreError::TransactionActive);
        }
        self.undo_log.clear();
        self.state = TransactionState::Active;
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        if self.state != TransactionState::Active {
            return Err(StoreError::NoActiveTransaction);
        }
        tracing::trace!(touched = self.undo_log.len(), "workspace commit");
        self.undo_log.clear();
        self.state = TransactionState::Inactive;
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        if self.state != TransactionState::Active {
            return Err(StoreError::NoActiveTransaction);
        }
        let originals = self.undo_log.drain_reverse();
        tracing::trace!(touched = originals.len(), "workspace rollback");

        // Put back every touched marker as it was, drop the ones created here
        for (key, original) in originals {
            self.take(&key);
            if let Some(marker) = original {
                self.insert(marker);
            }
        }

        self.state = TransactionState::Inactive;
        Ok(())
    }
}
