//! The `BlobStore` port (spec.md Section 4.2).

use crate::domain::errors::BlobStoreError;
use async_trait::async_trait;

/// Content-addressed immutable byte store.
///
/// `put` blocks until the blob is durably confirmed by the backend; `get`
/// returns the exact bytes previously stored under a given id.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Durably store `bytes`, returning an opaque content-derived id.
    async fn put(&self, bytes: &[u8]) -> Result<String, BlobStoreError>;

    /// Retrieve the bytes stored under `blob_id`.
    async fn get(&self, blob_id: &str) -> Result<Vec<u8>, BlobStoreError>;
}
