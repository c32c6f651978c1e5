//! Blob store and master index error kinds.

use thiserror::Error;

/// Errors from the `BlobStore` contract (spec.md Section 4.2).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlobStoreError {
    #[error("blob {0} not found")]
    NotFound(String),

    #[error("blob store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Errors from master index operations (spec.md Section 4.2, 7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MasterIndexError {
    #[error("failed to persist master index: {0}")]
    IndexPersistFailed(String),

    #[error(transparent)]
    Store(#[from] BlobStoreError),
}
