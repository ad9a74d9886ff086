//! Mark Mutation
//!
//! Undoable attribute updates on one or more markers.
//!
//! Responsibilities:
//! - Capture each target's attribute map before writing it
//! - Apply merged or replacing attribute sets inside one store transaction
//! - Swap captured state in as the next payload, so undo and redo are the
//!   same routine as execute
//! - Report progress per target and honor cancellation between targets
//!
//! # Module Structure
//!
//! - `operation` - UpdateMarkersOperation and its next-application state
//! - `executor` - Batch run of one application across all targets
//! - `snapshot` - Attribute snapshots and merge policy
//! - `progress` - Progress reporter contract and the null reporter
//! - `error` - Error types for mutation failures
//! - `result` - Result types for mutation outcomes

mod error;
mod executor;
mod operation;
mod progress;
mod result;
mod snapshot;

pub use error::{MutationError, MutationResult};
pub use operation::{UpdateMarkersOperation, DEFAULT_TOTAL_WORK};
pub use progress::{NullProgress, ProgressReporter, WorkMeter};
pub use result::{Direction, MutationOutcome};
pub use snapshot::{AttributeSnapshot, MergePolicy};
