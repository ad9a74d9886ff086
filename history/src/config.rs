//! Configuration for operation history.

/// Default number of operations kept for undo.
pub const DEFAULT_UNDO_LIMIT: usize = 25;

/// Configuration for operation history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of operations kept on the undo stack; the oldest
    /// is dropped when a new one would exceed it
    pub undo_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            undo_limit: DEFAULT_UNDO_LIMIT,
        }
    }
}

impl HistoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_undo_limit(mut self, limit: usize) -> Self {
        self.undo_limit = limit;
        self
    }
}
