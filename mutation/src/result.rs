//! Mutation result types.

use mark_core::MarkerKey;

/// Which payload a run applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The caller's attributes were applied (first execution).
    Applied,
    /// Captured snapshots were restored (undo, or redo after an undo).
    Restored,
    /// The prefix written by a cancelled run was put back.
    Compensated,
}

/// Outcome of one successful execute, undo or redo.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    /// Label of the operation that ran.
    pub label: String,
    /// Which payload was written.
    pub direction: Direction,
    /// Updated markers, in target order.
    pub updated: Vec<MarkerKey>,
}

impl MutationOutcome {
    pub fn new(label: impl Into<String>, direction: Direction, updated: Vec<MarkerKey>) -> Self {
        Self {
            label: label.into(),
            direction,
            updated,
        }
    }

    /// Number of updated markers.
    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }
}
