//! Durable catalog mapping `(chain, block-hash)` and `(chain, height)` to
//! transcript blob ids.
//!
//! Reference: spec.md Section 4.2 and Section 3, **MasterIndex**. Rewritten
//! as a new immutable blob on every update; the new blob's id is persisted
//! to a tiny on-disk config file (`eigenda_master_index.json`) following
//! the write-to-temp-then-rename discipline of
//! `qc-02-block-storage::adapters::storage::FileBackedKVStore::save_to_file`.

use crate::adapters::file::write_atomic;
use crate::blob_store::BlobStore;
use crate::domain::errors::{BlobStoreError, MasterIndexError};
use crate::domain::transcript::BlobReference;
use chaoschain_types::ChainId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};

/// The name of the on-disk pointer file, as named in spec.md Section 6.
pub const MASTER_INDEX_FILE: &str = "eigenda_master_index.json";

/// The in-memory catalog contents, serialized as the blob content itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterIndex {
    pub chain_indices: HashMap<ChainId, HashMap<String, BlobReference>>,
    pub last_updated: u64,
}

/// The tiny on-disk pointer file's contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    master_index_id: String,
    last_updated: u64,
}

/// Wraps a `BlobStore` and the on-disk pointer file, implementing spec.md
/// Section 4.2's master-index contract.
pub struct MasterIndexStore {
    blob_store: Arc<dyn BlobStore>,
    config_path: PathBuf,
    index: RwLock<MasterIndex>,
    /// Serializes `record_transcript` end to end (mutate, snapshot, blob
    /// `put`, pointer-file rewrite) across every chain sharing this store.
    /// Without this, two chains finalizing concurrently can each snapshot
    /// before the other's pointer write lands, and whichever `put`+rewrite
    /// finishes last silently overwrites the other's reference out of the
    /// on-disk pointer (spec.md Section 5: persistence holds the write
    /// lock for its entire duration). A `parking_lot` guard cannot be held
    /// across the `.await`s in `put`/`write_pointer`, so persistence gets
    /// its own async mutex rather than reusing `index`'s `RwLock`.
    persist_lock: AsyncMutex<()>,
}

impl MasterIndexStore {
    /// Loads the index from `config_dir/eigenda_master_index.json` via
    /// `blob_store` if present; starts empty if absent or unreadable.
    pub async fn load(blob_store: Arc<dyn BlobStore>, config_dir: impl AsRef<Path>) -> Self {
        let config_path = config_dir.as_ref().join(MASTER_INDEX_FILE);
        let index = Self::load_index(&blob_store, &config_path)
            .await
            .unwrap_or_default();

        Self {
            blob_store,
            config_path,
            index: RwLock::new(index),
            persist_lock: AsyncMutex::new(()),
        }
    }

    async fn load_index(blob_store: &Arc<dyn BlobStore>, config_path: &Path) -> Option<MasterIndex> {
        let contents = std::fs::read_to_string(config_path).ok()?;
        let pointer: ConfigFile = serde_json::from_str(&contents).ok()?;
        let bytes = blob_store.get(&pointer.master_index_id).await.ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Upserts `reference` into the in-memory index, persists a new
    /// immutable blob, and atomically rewrites the pointer file. On `put`
    /// failure, the in-memory update is rolled back.
    ///
    /// The whole sequence runs under `persist_lock`, so two chains' calls
    /// never interleave: the second caller's snapshot always includes the
    /// first caller's completed update, and the pointer file ends up
    /// referencing the union of both rather than whichever `put` happened
    /// to land last (spec.md Section 5).
    pub async fn record_transcript(&self, reference: BlobReference) -> Result<(), MasterIndexError> {
        let _guard = self.persist_lock.lock().await;

        let snapshot = {
            let mut index = self.index.write();
            let chain_map = index.chain_indices.entry(reference.chain_id.clone()).or_default();
            chain_map.insert(reference.block_hash.clone(), reference.clone());
            index.last_updated = reference.timestamp;
            index.clone()
        };

        let bytes = serde_json::to_vec(&snapshot).map_err(|e| {
            MasterIndexError::IndexPersistFailed(format!("serialize master index: {e}"))
        })?;

        let put_result = self.blob_store.put(&bytes).await;
        let blob_id = match put_result {
            Ok(id) => id,
            Err(e) => {
                self.rollback_upsert(&reference);
                warn!(error = %e, "master index persist failed");
                return Err(MasterIndexError::IndexPersistFailed(e.to_string()));
            }
        };

        let pointer = ConfigFile {
            master_index_id: blob_id,
            last_updated: snapshot.last_updated,
        };
        if let Err(e) = self.write_pointer(&pointer) {
            self.rollback_upsert(&reference);
            return Err(MasterIndexError::IndexPersistFailed(e.to_string()));
        }

        info!(
            chain_id = %reference.chain_id,
            block_hash = %reference.block_hash,
            "transcript recorded in master index"
        );
        Ok(())
    }

    fn rollback_upsert(&self, reference: &BlobReference) {
        let mut index = self.index.write();
        if let Some(chain_map) = index.chain_indices.get_mut(&reference.chain_id) {
            chain_map.remove(&reference.block_hash);
        }
    }

    fn write_pointer(&self, pointer: &ConfigFile) -> Result<(), BlobStoreError> {
        let bytes = serde_json::to_vec_pretty(pointer)
            .map_err(|e| BlobStoreError::StoreUnavailable(e.to_string()))?;
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        write_atomic(&root, &self.config_path, &bytes)
    }

    /// Lookup by block hash within one chain.
    #[must_use]
    pub fn by_block_hash(&self, chain_id: &str, block_hash: &str) -> Option<BlobReference> {
        self.index
            .read()
            .chain_indices
            .get(chain_id)
            .and_then(|m| m.get(block_hash))
            .cloned()
    }

    /// Lookup by height within one chain.
    #[must_use]
    pub fn by_height(&self, chain_id: &str, height: u64) -> Option<BlobReference> {
        self.index
            .read()
            .chain_indices
            .get(chain_id)
            .and_then(|m| m.values().find(|r| r.block_height == height))
            .cloned()
    }

    /// All references for a chain, sorted by descending height.
    #[must_use]
    pub fn list_for_chain(&self, chain_id: &str) -> Vec<BlobReference> {
        let mut refs: Vec<BlobReference> = self
            .index
            .read()
            .chain_indices
            .get(chain_id)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default();
        refs.sort_by(|a, b| b.block_height.cmp(&a.block_height));
        refs
    }
}
