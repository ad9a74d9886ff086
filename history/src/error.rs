//! History error types.

use mark_core::MarkerKey;
use mark_mutation::MutationError;
use thiserror::Error;

/// History errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HistoryError {
    /// The undo stack is empty.
    #[error("nothing to undo")]
    NothingToUndo,

    /// The redo stack is empty.
    #[error("nothing to redo")]
    NothingToRedo,

    /// The operation cannot run against the current store state.
    #[error("cannot run '{label}': {} marker(s) no longer exist", .missing.len())]
    NotReversible {
        label: String,
        missing: Vec<MarkerKey>,
    },

    /// The operation itself failed.
    #[error("operation error: {0}")]
    Operation(#[from] MutationError),
}

impl HistoryError {
    pub fn not_reversible(label: impl Into<String>, missing: Vec<MarkerKey>) -> Self {
        Self::NotReversible {
            label: label.into(),
            missing,
        }
    }
}

/// Result type for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;
