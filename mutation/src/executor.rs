//! Batch executor - runs one application of a payload across its targets.
//!
//! A run opens one store transaction, checks that every target exists,
//! then walks the targets in order: poll cancellation, read the current
//! map, capture it, compute the map to write, report progress. All
//! computed maps are written with one batch call before commit.

use mark_core::{Attributes, MarkerKey};
use mark_store::{MarkerStore, StoreTransaction};

use crate::error::{MutationError, MutationResult};
use crate::progress::{ProgressReporter, WorkMeter};
use crate::snapshot::{AttributeSnapshot, MergePolicy};

/// What one run writes.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Payload<'a> {
    /// Combine `attributes` into each target under `policy`.
    Apply {
        targets: &'a [MarkerKey],
        attributes: &'a Attributes,
        policy: MergePolicy,
    },
    /// Put each snapshot's map back on its marker verbatim.
    Restore(&'a [AttributeSnapshot]),
}

impl<'a> Payload<'a> {
    fn len(&self) -> usize {
        match self {
            Payload::Apply { targets, .. } => targets.len(),
            Payload::Restore(snapshots) => snapshots.len(),
        }
    }

    fn key(&self, index: usize) -> &'a MarkerKey {
        match self {
            Payload::Apply { targets, .. } => &targets[index],
            Payload::Restore(snapshots) => snapshots[index].key(),
        }
    }

    fn keys(&self) -> impl Iterator<Item = &'a MarkerKey> + '_ {
        (0..self.len()).map(move |index| self.key(index))
    }

    fn attributes_for(&self, index: usize, current: &Attributes) -> Attributes {
        match self {
            Payload::Apply {
                attributes, policy, ..
            } => policy.combine(current, attributes),
            // Restores always replace, so keys added since capture go away
            Payload::Restore(snapshots) => snapshots[index].attributes().clone(),
        }
    }
}

/// Result of a run that wrote something.
#[derive(Debug)]
pub(crate) struct BatchRun {
    /// State of each written marker before the run, in payload order.
    pub captured: Vec<AttributeSnapshot>,
    /// False when cancellation stopped the run after a prefix.
    pub completed: bool,
}

impl BatchRun {
    pub fn written_keys(&self) -> Vec<MarkerKey> {
        self.captured.iter().map(|s| s.key().clone()).collect()
    }
}

/// Runs payloads against a store, reporting to one progress reporter.
pub(crate) struct BatchExecutor<'p> {
    progress: &'p mut dyn ProgressReporter,
    total_work: u64,
}

impl<'p> BatchExecutor<'p> {
    pub fn new(progress: &'p mut dyn ProgressReporter, total_work: u64) -> Self {
        Self {
            progress,
            total_work,
        }
    }

    /// Run `payload` against `store`.
    ///
    /// Fatal errors roll the transaction back, so nothing is written.
    /// Cancellation before the first target is `Cancelled` with nothing
    /// written; cancellation later commits the prefix and returns a run
    /// with `completed == false`.
    pub fn run<S: MarkerStore + ?Sized>(
        &mut self,
        store: &mut S,
        payload: Payload<'_>,
    ) -> MutationResult<BatchRun> {
        self.progress.begin_task(self.total_work);
        let result = self.run_in_transaction(store, payload);
        self.progress.done();
        result
    }

    fn run_in_transaction<S: MarkerStore + ?Sized>(
        &mut self,
        store: &mut S,
        payload: Payload<'_>,
    ) -> MutationResult<BatchRun> {
        let mut txn = StoreTransaction::begin(store)?;

        // Every target must resolve before anything is read or written
        if let Some(missing) = payload.keys().find(|key| !txn.exists(key)) {
            tracing::warn!(marker = %missing, "update target no longer exists");
            return Err(MutationError::record_missing(missing.clone()));
        }

        let total = payload.len();
        let mut meter = WorkMeter::new(self.total_work, total);
        let mut captured = Vec::with_capacity(total);
        let mut updates = Vec::with_capacity(total);

        for index in 0..total {
            if self.progress.is_cancelled() {
                tracing::warn!(processed = index, total, "update cancelled");
                break;
            }

            let key = payload.key(index);
            let current = txn.get_attributes(key)?;
            let next = payload.attributes_for(index, &current);
            tracing::trace!(marker = %key, before = current.len(), after = next.len(), "target prepared");

            captured.push(AttributeSnapshot::capture(key.clone(), current));
            updates.push((key.clone(), next));
            self.progress.worked(meter.step());
        }

        if captured.is_empty() && total > 0 {
            return Err(MutationError::Cancelled);
        }

        txn.set_attributes_batch(updates)?;
        txn.commit()?;

        Ok(BatchRun {
            completed: captured.len() == total,
            captured,
        })
    }
}
