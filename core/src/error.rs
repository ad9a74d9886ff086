//! Common error types for marker stores.

use crate::MarkerKey;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Marker not found.
    #[error("Marker not found: {0}")]
    MarkerNotFound(MarkerKey),

    /// A transaction is already open on this store.
    #[error("A transaction is already active")]
    TransactionActive,

    /// Commit or rollback without an open transaction.
    #[error("No transaction is active")]
    NoActiveTransaction,

    /// The store refused to write a marker.
    #[error("Write rejected for {key}: {message}")]
    WriteRejected { key: MarkerKey, message: String },

    /// The transaction could not be committed.
    #[error("Commit failed: {message}")]
    CommitFailed { message: String },
}

impl StoreError {
    pub fn write_rejected(key: MarkerKey, message: impl Into<String>) -> Self {
        Self::WriteRejected {
            key,
            message: message.into(),
        }
    }

    pub fn commit_failed(message: impl Into<String>) -> Self {
        Self::CommitFailed {
            message: message.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
