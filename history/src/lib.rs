//! Mark History
//!
//! Undo/redo stacks driving undoable marker operations.
//!
//! Responsibilities:
//! - Run an operation and record it for undo
//! - Move operations between the undo and redo stacks
//! - Answer whether undo/redo is currently possible, from live store state
//! - Bound the undo stack to a configured limit

mod config;
mod error;
mod history;
mod operation;

pub use config::HistoryConfig;
pub use error::{HistoryError, HistoryResult};
pub use history::OperationHistory;
pub use operation::UndoableOperation;
