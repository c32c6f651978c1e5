//! Process-wide consensus manager registry.
//!
//! Mirrors `chaoschain_ledger::registry::ChainRegistry` and
//! `chaoschain_mempool::registry::MempoolRegistry`'s shape: a lazily
//! populated map guarded by a read/write lock, keyed only by `ChainId`
//! (spec.md Section 9).

use crate::config::ConsensusConfig;
use crate::manager::ConsensusManager;
use chaoschain_bus::InMemoryEventBus;
use chaoschain_ledger::ChainRegistry;
use chaoschain_mempool::MempoolRegistry;
use chaoschain_transcripts::{BlobStore, MasterIndexStore};
use chaoschain_types::ChainId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// The process-wide map of `ChainID -> ConsensusManager`. Collaborators
/// (bus, chain registry, mempool registry, blob store, master index) are
/// shared across every manager the registry creates.
pub struct ConsensusManagerRegistry {
    managers: RwLock<HashMap<ChainId, Arc<ConsensusManager>>>,
    config: ConsensusConfig,
    bus: Arc<InMemoryEventBus>,
    chains: Arc<ChainRegistry>,
    mempools: Arc<MempoolRegistry>,
    blob_store: Arc<dyn BlobStore>,
    master_index: Arc<MasterIndexStore>,
}

impl ConsensusManagerRegistry {
    #[must_use]
    pub fn new(
        config: ConsensusConfig,
        bus: Arc<InMemoryEventBus>,
        chains: Arc<ChainRegistry>,
        mempools: Arc<MempoolRegistry>,
        blob_store: Arc<dyn BlobStore>,
        master_index: Arc<MasterIndexStore>,
    ) -> Self {
        Self {
            managers: RwLock::new(HashMap::new()),
            config,
            bus,
            chains,
            mempools,
            blob_store,
            master_index,
        }
    }

    /// Returns the manager for `chain_id`, constructing one on first
    /// access.
    #[must_use]
    pub fn get_or_create(&self, chain_id: &str) -> Arc<ConsensusManager> {
        if let Some(existing) = self.managers.read().get(chain_id) {
            return Arc::clone(existing);
        }
        let mut managers = self.managers.write();
        Arc::clone(managers.entry(chain_id.to_string()).or_insert_with(|| {
            ConsensusManager::new(
                chain_id.to_string(),
                self.config,
                Arc::clone(&self.bus),
                Arc::clone(&self.chains),
                Arc::clone(&self.mempools),
                Arc::clone(&self.blob_store),
                Arc::clone(&self.master_index),
            )
        }))
    }

    #[must_use]
    pub fn get(&self, chain_id: &str) -> Option<Arc<ConsensusManager>> {
        self.managers.read().get(chain_id).cloned()
    }

    #[must_use]
    pub fn list_chains(&self) -> Vec<ChainId> {
        self.managers.read().keys().cloned().collect()
    }
}
