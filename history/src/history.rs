//! Operation history for undo and redo.

use mark_mutation::{MutationOutcome, MutationResult, ProgressReporter};
use mark_store::MarkerStore;

use crate::config::HistoryConfig;
use crate::error::{HistoryError, HistoryResult};
use crate::operation::UndoableOperation;

type BoxedOperation<S> = Box<dyn UndoableOperation<S>>;

/// Undo and redo stacks of operations run against one kind of store.
///
/// An operation that ran, even partially, moves to the opposite stack so
/// the opposite command can reverse whatever it wrote. An operation that
/// failed without writing anything stays where it was (or, for a fresh
/// execute, is dropped).
pub struct OperationHistory<S: MarkerStore + ?Sized> {
    config: HistoryConfig,
    undo_stack: Vec<BoxedOperation<S>>,
    redo_stack: Vec<BoxedOperation<S>>,
}

impl<S: MarkerStore + ?Sized> Default for OperationHistory<S> {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl<S: MarkerStore + ?Sized> OperationHistory<S> {
    /// Create an empty history.
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            config,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    // ========== Commands ==========

    /// Execute `operation` and record it for undo.
    pub fn execute(
        &mut self,
        mut operation: BoxedOperation<S>,
        store: &mut S,
        progress: &mut dyn ProgressReporter,
    ) -> HistoryResult<MutationOutcome> {
        if !operation.can_execute(store) {
            let missing = operation.missing_markers(store);
            tracing::warn!(label = operation.label(), missing = missing.len(), "operation cannot execute");
            return Err(HistoryError::not_reversible(operation.label(), missing));
        }

        let result = operation.execute(store, progress);
        if ran(&result) {
            tracing::info!(label = operation.label(), "executed");
            self.redo_stack.clear();
            self.push_undo(operation);
        }
        result.map_err(HistoryError::from)
    }

    /// Undo the most recent operation.
    pub fn undo(
        &mut self,
        store: &mut S,
        progress: &mut dyn ProgressReporter,
    ) -> HistoryResult<MutationOutcome> {
        let mut operation = self.undo_stack.pop().ok_or(HistoryError::NothingToUndo)?;

        if !operation.can_undo(store) {
            let err = HistoryError::not_reversible(operation.label(), operation.missing_markers(store));
            tracing::warn!(label = operation.label(), "undo not possible");
            self.undo_stack.push(operation);
            return Err(err);
        }

        let result = operation.undo(store, progress);
        if ran(&result) {
            tracing::info!(label = operation.label(), "undone");
            self.redo_stack.push(operation);
        } else {
            self.undo_stack.push(operation);
        }
        result.map_err(HistoryError::from)
    }

    /// Redo the most recently undone operation.
    pub fn redo(
        &mut self,
        store: &mut S,
        progress: &mut dyn ProgressReporter,
    ) -> HistoryResult<MutationOutcome> {
        let mut operation = self.redo_stack.pop().ok_or(HistoryError::NothingToRedo)?;

        if !operation.can_redo(store) {
            let err = HistoryError::not_reversible(operation.label(), operation.missing_markers(store));
            tracing::warn!(label = operation.label(), "redo not possible");
            self.redo_stack.push(operation);
            return Err(err);
        }

        let result = operation.redo(store, progress);
        if ran(&result) {
            tracing::info!(label = operation.label(), "redone");
            self.push_undo(operation);
        } else {
            self.redo_stack.push(operation);
        }
        result.map_err(HistoryError::from)
    }

    // ========== Queries ==========

    /// Check if the top of the undo stack can run against `store` now.
    pub fn can_undo(&self, store: &S) -> bool {
        self.undo_stack
            .last()
            .is_some_and(|operation| operation.can_undo(store))
    }

    /// Check if the top of the redo stack can run against `store` now.
    pub fn can_redo(&self, store: &S) -> bool {
        self.redo_stack
            .last()
            .is_some_and(|operation| operation.can_redo(store))
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().map(|operation| operation.label())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|operation| operation.label())
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop every recorded operation and its captured state.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    // ========== Internal Helpers ==========

    fn push_undo(&mut self, operation: BoxedOperation<S>) {
        self.undo_stack.push(operation);
        while self.undo_stack.len() > self.config.undo_limit {
            let dropped = self.undo_stack.remove(0);
            tracing::debug!(label = dropped.label(), "undo limit reached, dropping oldest");
        }
    }
}

/// True when the run wrote something the opposite command must reverse.
fn ran(result: &MutationResult<MutationOutcome>) -> bool {
    match result {
        Ok(_) => true,
        Err(e) => !e.applied_targets().is_empty(),
    }
}
