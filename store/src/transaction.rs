//! Scoped store transactions.

use std::ops::{Deref, DerefMut};

use mark_core::StoreResult;

use crate::store::MarkerStore;

/// A transaction that is rolled back unless explicitly committed.
///
/// The guard borrows the store mutably for its whole lifetime, so no other
/// writer can interleave with the work done through it. Dropping the guard
/// without calling [`StoreTransaction::commit`] (an early `?` return, an
/// error branch, unwinding) rolls the transaction back.
pub struct StoreTransaction<'s, S: MarkerStore + ?Sized> {
    store: &'s mut S,
    finished: bool,
}

impl<'s, S: MarkerStore + ?Sized> StoreTransaction<'s, S> {
    /// Begin a transaction on `store`.
    pub fn begin(store: &'s mut S) -> StoreResult<Self> {
        store.begin()?;
        Ok(Self {
            store,
            finished: false,
        })
    }

    /// Commit the transaction.
    ///
    /// If the store refuses the commit, the transaction is rolled back
    /// before the error is returned.
    pub fn commit(mut self) -> StoreResult<()> {
        self.finished = true;
        if let Err(e) = self.store.commit() {
            tracing::warn!(error = %e, "commit failed, rolling back");
            if let Err(rollback_err) = self.store.rollback() {
                tracing::warn!(error = %rollback_err, "rollback after failed commit also failed");
            }
            return Err(e);
        }
        Ok(())
    }
}

impl<S: MarkerStore + ?Sized> Deref for StoreTransaction<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.store
    }
}

impl<S: MarkerStore + ?Sized> DerefMut for StoreTransaction<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.store
    }
}

impl<S: MarkerStore + ?Sized> Drop for StoreTransaction<'_, S> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        tracing::debug!("store transaction dropped without commit, rolling back");
        if let Err(e) = self.store.rollback() {
            tracing::warn!(error = %e, "rollback of abandoned transaction failed");
        }
    }
}
