//! The contract between the history and the operations it drives.

use mark_core::MarkerKey;
use mark_mutation::{MutationOutcome, MutationResult, ProgressReporter, UpdateMarkersOperation};
use mark_store::MarkerStore;

/// An operation that can be executed, undone and redone against a store.
pub trait UndoableOperation<S: MarkerStore + ?Sized> {
    /// Human-readable description, shown next to undo/redo controls.
    fn label(&self) -> &str;

    fn execute(
        &mut self,
        store: &mut S,
        progress: &mut dyn ProgressReporter,
    ) -> MutationResult<MutationOutcome>;

    fn undo(
        &mut self,
        store: &mut S,
        progress: &mut dyn ProgressReporter,
    ) -> MutationResult<MutationOutcome>;

    fn redo(
        &mut self,
        store: &mut S,
        progress: &mut dyn ProgressReporter,
    ) -> MutationResult<MutationOutcome> {
        self.execute(store, progress)
    }

    fn can_execute(&self, store: &S) -> bool;

    fn can_undo(&self, store: &S) -> bool;

    fn can_redo(&self, store: &S) -> bool {
        self.can_execute(store)
    }

    /// Markers that keep the operation from running, for error messages.
    fn missing_markers(&self, store: &S) -> Vec<MarkerKey>;
}

impl<S: MarkerStore + ?Sized> UndoableOperation<S> for UpdateMarkersOperation {
    fn label(&self) -> &str {
        UpdateMarkersOperation::label(self)
    }

    fn execute(
        &mut self,
        store: &mut S,
        progress: &mut dyn ProgressReporter,
    ) -> MutationResult<MutationOutcome> {
        UpdateMarkersOperation::execute(self, store, progress)
    }

    fn undo(
        &mut self,
        store: &mut S,
        progress: &mut dyn ProgressReporter,
    ) -> MutationResult<MutationOutcome> {
        UpdateMarkersOperation::undo(self, store, progress)
    }

    fn redo(
        &mut self,
        store: &mut S,
        progress: &mut dyn ProgressReporter,
    ) -> MutationResult<MutationOutcome> {
        UpdateMarkersOperation::redo(self, store, progress)
    }

    fn can_execute(&self, store: &S) -> bool {
        UpdateMarkersOperation::can_execute(self, store)
    }

    fn can_undo(&self, store: &S) -> bool {
        UpdateMarkersOperation::can_undo(self, store)
    }

    fn can_redo(&self, store: &S) -> bool {
        UpdateMarkersOperation::can_redo(self, store)
    }

    fn missing_markers(&self, store: &S) -> Vec<MarkerKey> {
        self.missing_targets(store)
    }
}
