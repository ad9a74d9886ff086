//! UPDATE operation - undoable attribute updates on a set of markers.
//!
//! Execute, undo and redo are one routine. Each run writes the payload
//! held in `next` and captures what it overwrote; the capture becomes the
//! following payload. After the first run the payload is always a list of
//! snapshots, restored verbatim, so undoing a merge removes the keys the
//! merge added.

use mark_core::{Attributes, MarkerKey};
use mark_store::MarkerStore;

use crate::error::{MutationError, MutationResult};
use crate::executor::{BatchExecutor, BatchRun, Payload};
use crate::progress::ProgressReporter;
use crate::result::{Direction, MutationOutcome};
use crate::snapshot::{AttributeSnapshot, MergePolicy};

/// Work units announced to the progress reporter when the caller does not
/// choose a total.
pub const DEFAULT_TOTAL_WORK: u64 = 100;

/// What the next run of an operation will write.
#[derive(Debug, Clone, PartialEq)]
enum NextApplication {
    /// Not yet applied: combine `attributes` into every target.
    Pending {
        attributes: Attributes,
        policy: MergePolicy,
    },
    /// Fully applied: restore one snapshot per target, in target order.
    Captured { snapshots: Vec<AttributeSnapshot> },
    /// A cancelled run wrote only the markers in `compensate`. The next run
    /// restores them, after which `resume` is what comes next again.
    PartiallyApplied {
        compensate: Vec<AttributeSnapshot>,
        resume: Box<NextApplication>,
    },
}

impl NextApplication {
    fn payload<'a>(&'a self, targets: &'a [MarkerKey]) -> Payload<'a> {
        match self {
            NextApplication::Pending { attributes, policy } => Payload::Apply {
                targets,
                attributes,
                policy: *policy,
            },
            NextApplication::Captured { snapshots } => Payload::Restore(snapshots),
            NextApplication::PartiallyApplied { compensate, .. } => Payload::Restore(compensate),
        }
    }

    fn direction(&self) -> Direction {
        match self {
            NextApplication::Pending { .. } => Direction::Applied,
            NextApplication::Captured { .. } => Direction::Restored,
            NextApplication::PartiallyApplied { .. } => Direction::Compensated,
        }
    }

    /// The state that follows a run of `self` that wrote `run`.
    fn after(self, run: BatchRun) -> NextApplication {
        if !run.completed {
            return NextApplication::PartiallyApplied {
                compensate: run.captured,
                resume: Box::new(self),
            };
        }
        match self {
            NextApplication::PartiallyApplied { resume, .. } => *resume,
            _ => NextApplication::Captured {
                snapshots: run.captured,
            },
        }
    }

    fn snapshots(&self) -> &[AttributeSnapshot] {
        match self {
            NextApplication::Pending { .. } => &[],
            NextApplication::Captured { snapshots } => snapshots,
            NextApplication::PartiallyApplied { compensate, .. } => compensate,
        }
    }
}

/// An undoable update of one or more markers with one attribute set.
#[derive(Debug, Clone)]
pub struct UpdateMarkersOperation {
    targets: Vec<MarkerKey>,
    label: String,
    total_work: u64,
    next: NextApplication,
}

impl UpdateMarkersOperation {
    /// Create an operation that updates every marker in `targets` with
    /// `attributes`, combined according to `policy`.
    pub fn new(
        targets: Vec<MarkerKey>,
        attributes: Attributes,
        label: impl Into<String>,
        policy: MergePolicy,
    ) -> Self {
        Self {
            targets,
            label: label.into(),
            total_work: DEFAULT_TOTAL_WORK,
            next: NextApplication::Pending { attributes, policy },
        }
    }

    /// Create an operation that updates a single marker.
    pub fn single(
        target: MarkerKey,
        attributes: Attributes,
        label: impl Into<String>,
        policy: MergePolicy,
    ) -> Self {
        Self::new(vec![target], attributes, label, policy)
    }

    /// Set the work units announced to the progress reporter per run.
    pub fn with_total_work(mut self, units: u64) -> Self {
        self.total_work = units;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn targets(&self) -> &[MarkerKey] {
        &self.targets
    }

    /// The policy the first run combines attributes with. Later runs
    /// restore snapshots and always replace.
    pub fn policy(&self) -> MergePolicy {
        match &self.next {
            NextApplication::Pending { policy, .. } => *policy,
            NextApplication::PartiallyApplied { resume, .. } => match resume.as_ref() {
                NextApplication::Pending { policy, .. } => *policy,
                _ => MergePolicy::Replace,
            },
            NextApplication::Captured { .. } => MergePolicy::Replace,
        }
    }

    /// Check if any run has written something.
    pub fn has_executed(&self) -> bool {
        !matches!(self.next, NextApplication::Pending { .. })
    }

    /// Snapshots the next run will restore; empty before the first run.
    pub fn prior_snapshots(&self) -> &[AttributeSnapshot] {
        self.next.snapshots()
    }

    /// Check if a cancelled run left only some targets written.
    pub fn is_partially_applied(&self) -> bool {
        matches!(self.next, NextApplication::PartiallyApplied { .. })
    }

    // ========== Execution ==========

    /// Apply the update.
    pub fn execute<S: MarkerStore + ?Sized>(
        &mut self,
        store: &mut S,
        progress: &mut dyn ProgressReporter,
    ) -> MutationResult<MutationOutcome> {
        self.apply_and_swap(store, progress)
    }

    /// Reverse the last run.
    pub fn undo<S: MarkerStore + ?Sized>(
        &mut self,
        store: &mut S,
        progress: &mut dyn ProgressReporter,
    ) -> MutationResult<MutationOutcome> {
        self.apply_and_swap(store, progress)
    }

    /// Reapply after an undo.
    pub fn redo<S: MarkerStore + ?Sized>(
        &mut self,
        store: &mut S,
        progress: &mut dyn ProgressReporter,
    ) -> MutationResult<MutationOutcome> {
        self.apply_and_swap(store, progress)
    }

    // ========== Reversibility ==========

    /// Check if the next run can be applied: every target, and every
    /// snapshot taken of an existing marker, still resolves in `store`.
    pub fn can_apply<S: MarkerStore + ?Sized>(&self, store: &S) -> bool {
        self.targets.iter().all(|key| store.exists(key))
            && self
                .next
                .snapshots()
                .iter()
                .filter(|s| s.existed_before())
                .all(|s| store.exists(s.key()))
    }

    pub fn can_execute<S: MarkerStore + ?Sized>(&self, store: &S) -> bool {
        self.can_apply(store)
    }

    pub fn can_undo<S: MarkerStore + ?Sized>(&self, store: &S) -> bool {
        self.can_apply(store)
    }

    pub fn can_redo<S: MarkerStore + ?Sized>(&self, store: &S) -> bool {
        self.can_apply(store)
    }

    /// Targets that no longer resolve in `store`, in target order.
    pub fn missing_targets<S: MarkerStore + ?Sized>(&self, store: &S) -> Vec<MarkerKey> {
        self.targets
            .iter()
            .filter(|key| !store.exists(key))
            .cloned()
            .collect()
    }

    // ========== Internal Helpers ==========

    fn apply_and_swap<S: MarkerStore + ?Sized>(
        &mut self,
        store: &mut S,
        progress: &mut dyn ProgressReporter,
    ) -> MutationResult<MutationOutcome> {
        let direction = self.next.direction();
        let payload = self.next.payload(&self.targets);
        let planned: Vec<MarkerKey> = match payload {
            Payload::Apply { targets, .. } => targets.to_vec(),
            Payload::Restore(snapshots) => snapshots.iter().map(|s| s.key().clone()).collect(),
        };
        tracing::debug!(label = %self.label, ?direction, targets = planned.len(), "running marker update");

        let run = BatchExecutor::new(progress, self.total_work).run(store, payload)?;
        let written = run.written_keys();
        let completed = run.completed;

        let previous = std::mem::replace(
            &mut self.next,
            NextApplication::Captured {
                snapshots: Vec::new(),
            },
        );
        self.next = previous.after(run);

        if !completed {
            let failed = planned[written.len()..].to_vec();
            tracing::warn!(
                label = %self.label,
                written = written.len(),
                skipped = failed.len(),
                "marker update stopped after a prefix"
            );
            return Err(MutationError::partial_failure(
                written,
                failed,
                MutationError::Cancelled,
            ));
        }

        tracing::debug!(label = %self.label, ?direction, updated = written.len(), "marker update finished");
        Ok(MutationOutcome::new(self.label.clone(), direction, written))
    }
}
