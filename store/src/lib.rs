//! Mark Store
//!
//! Marker storage behind a transactional record-store contract:
//! - `MarkerStore` trait: existence checks, attribute reads and writes,
//!   and begin/commit/rollback of one transaction at a time
//! - `StoreTransaction`: scoped guard that rolls back on every exit path
//!   that did not commit
//! - `MarkerWorkspace`: in-memory store with a kind index and a
//!   per-transaction undo log

mod buffer;
mod index;
mod store;
mod transaction;
mod workspace;

pub use buffer::UndoLog;
pub use store::MarkerStore;
pub use transaction::StoreTransaction;
pub use workspace::{MarkerWorkspace, TransactionState};
