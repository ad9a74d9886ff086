//! The record-store contract consumed by marker operations.

use mark_core::{Attributes, MarkerKey, StoreResult};

/// A transactional store of markers.
///
/// Implementations hold at most one open transaction. Writes made between
/// `begin` and `commit` become visible atomically; `rollback` discards them.
/// A failed `commit` leaves the transaction open so the caller can roll it
/// back.
pub trait MarkerStore {
    /// Check if a marker with this key currently exists.
    fn exists(&self, key: &MarkerKey) -> bool;

    /// Read a copy of the marker's attribute map.
    fn get_attributes(&self, key: &MarkerKey) -> StoreResult<Attributes>;

    /// Replace the marker's attribute map with `attributes`.
    fn set_attributes(&mut self, key: &MarkerKey, attributes: Attributes) -> StoreResult<()>;

    /// Replace the attribute maps of several markers, in order.
    ///
    /// Stops at the first failing write; callers run this inside a
    /// transaction so earlier writes are discarded with it.
    fn set_attributes_batch(&mut self, updates: Vec<(MarkerKey, Attributes)>) -> StoreResult<()> {
        for (key, attributes) in updates {
            self.set_attributes(&key, attributes)?;
        }
        Ok(())
    }

    /// Open a transaction.
    fn begin(&mut self) -> StoreResult<()>;

    /// Make every write since `begin` permanent.
    fn commit(&mut self) -> StoreResult<()>;

    /// Discard every write since `begin`.
    fn rollback(&mut self) -> StoreResult<()>;
}
