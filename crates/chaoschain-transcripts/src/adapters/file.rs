//! File-backed `BlobStore`: one file per blob under a content-hash path.
//!
//! Reference: `qc-02-block-storage::adapters::storage::FileBackedKVStore`'s
//! atomic write-to-temp-then-rename discipline, generalized so the file
//! name is the content hash rather than a caller-supplied key.

use crate::blob_store::BlobStore;
use crate::domain::errors::BlobStoreError;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

fn blob_id_for(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    chaoschain_types::hash_to_hex(&hasher.finalize().into())
}

/// Persists one file per blob under `root`, named by the blob's SHA-256 id.
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, blob_id: &str) -> PathBuf {
        self.root.join(format!("{blob_id}.blob"))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn put(&self, bytes: &[u8]) -> Result<String, BlobStoreError> {
        let id = blob_id_for(bytes);
        let path = self.path_for(&id);
        let root = self.root.clone();
        let data = bytes.to_vec();

        tokio::task::spawn_blocking(move || write_atomic(&root, &path, &data))
            .await
            .map_err(|e| BlobStoreError::StoreUnavailable(e.to_string()))??;

        Ok(id)
    }

    async fn get(&self, blob_id: &str) -> Result<Vec<u8>, BlobStoreError> {
        let path = self.path_for(blob_id);
        let blob_id = blob_id.to_string();
        tokio::task::spawn_blocking(move || {
            std::fs::read(&path).map_err(|_| BlobStoreError::NotFound(blob_id))
        })
        .await
        .map_err(|e| BlobStoreError::StoreUnavailable(e.to_string()))?
    }
}

/// Write `data` to `path` atomically: write to a sibling temp file, `fsync`,
/// then rename over the final path.
pub(crate) fn write_atomic(root: &Path, path: &Path, data: &[u8]) -> Result<(), BlobStoreError> {
    use std::io::Write;

    std::fs::create_dir_all(root)
        .map_err(|e| BlobStoreError::StoreUnavailable(e.to_string()))?;

    let temp_path = path.with_extension("tmp");
    let mut file = std::fs::File::create(&temp_path)
        .map_err(|e| BlobStoreError::StoreUnavailable(e.to_string()))?;
    file.write_all(data)
        .map_err(|e| BlobStoreError::StoreUnavailable(e.to_string()))?;
    file.sync_all()
        .map_err(|e| BlobStoreError::StoreUnavailable(e.to_string()))?;
    std::fs::rename(&temp_path, path).map_err(|e| BlobStoreError::StoreUnavailable(e.to_string()))
}
