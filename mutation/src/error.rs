//! Mutation error types.

use mark_core::{MarkerKey, StoreError};
use thiserror::Error;

/// Result type for mutation operations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors that can occur while applying a marker update.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MutationError {
    /// A target marker no longer exists. Nothing was written.
    #[error("Marker not found: {key}")]
    RecordMissing { key: MarkerKey },

    /// The store transaction failed. Nothing was written.
    #[error("Store transaction failed: {source}")]
    StoreTransaction {
        #[source]
        source: StoreError,
    },

    /// The caller cancelled before any target was written.
    #[error("Operation cancelled")]
    Cancelled,

    /// Some targets were written before the run stopped.
    #[error(
        "Updated {} of {} markers: {cause}",
        .succeeded.len(),
        .succeeded.len() + .failed.len()
    )]
    PartialFailure {
        succeeded: Vec<MarkerKey>,
        failed: Vec<MarkerKey>,
        cause: Box<MutationError>,
    },
}

impl MutationError {
    pub fn record_missing(key: MarkerKey) -> Self {
        Self::RecordMissing { key }
    }

    pub fn partial_failure(
        succeeded: Vec<MarkerKey>,
        failed: Vec<MarkerKey>,
        cause: MutationError,
    ) -> Self {
        Self::PartialFailure {
            succeeded,
            failed,
            cause: Box::new(cause),
        }
    }

    /// Targets whose attributes were changed despite the error.
    pub fn applied_targets(&self) -> &[MarkerKey] {
        match self {
            Self::PartialFailure { succeeded, .. } => succeeded,
            _ => &[],
        }
    }

    /// True for failures that left the store untouched and were not
    /// requested by the caller.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RecordMissing { .. } | Self::StoreTransaction { .. })
    }

    /// Markers named by this error, for user-facing messages.
    pub fn affected_markers(&self) -> Vec<MarkerKey> {
        match self {
            Self::RecordMissing { key } => vec![key.clone()],
            Self::StoreTransaction { source } => match source {
                StoreError::WriteRejected { key, .. } => vec![key.clone()],
                _ => Vec::new(),
            },
            Self::Cancelled => Vec::new(),
            Self::PartialFailure { failed, .. } => failed.clone(),
        }
    }
}

impl From<StoreError> for MutationError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::MarkerNotFound(key) => Self::RecordMissing { key },
            source => Self::StoreTransaction { source },
        }
    }
}
