//! In-memory `BlobStore`, content-addressed by SHA-256.
//!
//! Reference: `qc-02-block-storage::adapters::storage::InMemoryKVStore`,
//! generalized from a key-value store to a content-addressed one (the key
//! is derived from the value, not supplied by the caller).

use crate::blob_store::BlobStore;
use crate::domain::errors::BlobStoreError;
use async_trait::async_trait;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

fn blob_id_for(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    chaoschain_types::hash_to_hex(&hasher.finalize().into())
}

/// In-process blob store for unit and integration tests.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, bytes: &[u8]) -> Result<String, BlobStoreError> {
        let id = blob_id_for(bytes);
        self.blobs.write().insert(id.clone(), bytes.to_vec());
        Ok(id)
    }

    async fn get(&self, blob_id: &str) -> Result<Vec<u8>, BlobStoreError> {
        self.blobs
            .read()
            .get(blob_id)
            .cloned()
            .ok_or_else(|| BlobStoreError::NotFound(blob_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryBlobStore::new();
        let id = store.put(b"hello").await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), b"hello".to_vec());
    }

    #[tokio::test]
    async fn identical_content_reuses_the_same_id() {
        let store = MemoryBlobStore::new();
        let a = store.put(b"same").await.unwrap();
        let b = store.put(b"same").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn get_missing_blob_errors() {
        let store = MemoryBlobStore::new();
        let err = store.get("deadbeef").await.unwrap_err();
        assert!(matches!(err, BlobStoreError::NotFound(_)));
    }
}
