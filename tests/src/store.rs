//! Fault-injecting store.

use std::cell::Cell;

use mark_core::{Attributes, MarkerKey, StoreError, StoreResult};
use mark_store::{MarkerStore, MarkerWorkspace};

/// Wraps a [`MarkerWorkspace`] and fails on request.
///
/// - `reject_batch_writes`: a batch write applies its first update, then
///   rejects the second, leaving a half-written transaction behind
/// - `reject_commit`: commit fails while the transaction is still open
/// - `vanish_on_read`: once `trigger` is read, `victim` reads as missing,
///   as if another writer deleted it mid-run
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MarkerWorkspace,
    reject_batch_writes: bool,
    reject_commit: bool,
    vanish: Option<(MarkerKey, MarkerKey)>,
    vanished: Cell<bool>,
}

impl FlakyStore {
    pub fn new(inner: MarkerWorkspace) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn reject_batch_writes(mut self) -> Self {
        self.reject_batch_writes = true;
        self
    }

    pub fn reject_commit(mut self) -> Self {
        self.reject_commit = true;
        self
    }

    pub fn vanish_on_read(mut self, trigger: MarkerKey, victim: MarkerKey) -> Self {
        self.vanish = Some((trigger, victim));
        self
    }

    /// Clear every fault.
    pub fn heal(&mut self) {
        self.reject_batch_writes = false;
        self.reject_commit = false;
        self.vanish = None;
        self.vanished.set(false);
    }

    pub fn workspace(&self) -> &MarkerWorkspace {
        &self.inner
    }

    fn hidden(&self, key: &MarkerKey) -> bool {
        self.vanished.get() && self.vanish.as_ref().is_some_and(|(_, victim)| victim == key)
    }
}

impl MarkerStore for FlakyStore {
    fn exists(&self, key: &MarkerKey) -> bool {
        !self.hidden(key) && self.inner.exists(key)
    }

    fn get_attributes(&self, key: &MarkerKey) -> StoreResult<Attributes> {
        if self.hidden(key) {
            return Err(StoreError::MarkerNotFound(key.clone()));
        }
        let attributes = self.inner.get_attributes(key)?;
        if self.vanish.as_ref().is_some_and(|(trigger, _)| trigger == key) {
            self.vanished.set(true);
        }
        Ok(attributes)
    }

    fn set_attributes(&mut self, key: &MarkerKey, attributes: Attributes) -> StoreResult<()> {
        if self.hidden(key) {
            return Err(StoreError::MarkerNotFound(key.clone()));
        }
        self.inner.set_attributes(key, attributes)
    }

    fn set_attributes_batch(&mut self, updates: Vec<(MarkerKey, Attributes)>) -> StoreResult<()> {
        for (index, (key, attributes)) in updates.into_iter().enumerate() {
            if self.reject_batch_writes && index > 0 {
                return Err(StoreError::write_rejected(key, "injected write failure"));
            }
            self.set_attributes(&key, attributes)?;
        }
        Ok(())
    }

    fn begin(&mut self) -> StoreResult<()> {
        self.inner.begin()
    }

    fn commit(&mut self) -> StoreResult<()> {
        if self.reject_commit {
            return Err(StoreError::commit_failed("injected commit failure"));
        }
        self.inner.commit()
    }

    fn rollback(&mut self) -> StoreResult<()> {
        self.inner.rollback()
    }
}
