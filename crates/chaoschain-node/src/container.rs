//! Process-wide subsystem container: wires the bus, chain registry, mempool
//! registry, transcript store, and consensus manager registry together and
//! exposes the handful of operations an external caller (ingress, CLI, API
//! surface — all out of this core's scope per spec.md Section 1) needs.
//!
//! Reference: `node_runtime::container::subsystems::SubsystemContainer` —
//! the single integration point where every subsystem is constructed once
//! and handed to whichever components need it, generalized here from
//! "subsystem" to "chain".

use crate::config::NodeConfig;
use chaoschain_agents::{RoundTiming, ValidatorHandle, ValidatorProfile};
use chaoschain_bus::InMemoryEventBus;
use chaoschain_consensus::{ConsensusManager, ConsensusManagerRegistry};
use chaoschain_ledger::{propose_transaction, ChainHandle, ChainRegistry, LedgerError};
use chaoschain_mempool::{MempoolRegistry, SignatureVerifier};
use chaoschain_oracle::Oracle;
use chaoschain_transcripts::{BlobStore, FileBlobStore, MasterIndexStore};
use chaoschain_types::{ChainId, Transaction};
use std::sync::Arc;
use tracing::info;

/// Holds one instance of every shared subsystem for the process. Cloning is
/// cheap (everything inside is an `Arc`); hand clones to adapters (HTTP/WS
/// surface, CLI) rather than sharing `&NodeContainer` across threads.
#[derive(Clone)]
pub struct NodeContainer {
    config: NodeConfig,
    bus: Arc<InMemoryEventBus>,
    chains: Arc<ChainRegistry>,
    mempools: Arc<MempoolRegistry>,
    blob_store: Arc<dyn BlobStore>,
    master_index: Arc<MasterIndexStore>,
    consensus_managers: Arc<ConsensusManagerRegistry>,
}

impl NodeContainer {
    /// Brings up every subsystem. Loads the master index from
    /// `config.data_dir` if a prior run left one (spec.md Section 4.2).
    pub async fn new(config: NodeConfig) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let bus = Arc::new(InMemoryEventBus::new());
        let chains = Arc::new(ChainRegistry::new());
        let mempools = Arc::new(MempoolRegistry::new());
        let blob_store: Arc<dyn BlobStore> =
            Arc::new(FileBlobStore::new(config.data_dir.join("blobs")));
        let master_index = Arc::new(MasterIndexStore::load(blob_store.clone(), &config.data_dir).await);
        let consensus_managers = Arc::new(ConsensusManagerRegistry::new(
            config.consensus,
            bus.clone(),
            chains.clone(),
            mempools.clone(),
            blob_store.clone(),
            master_index.clone(),
        ));

        info!(data_dir = %config.data_dir.display(), "chaoschain node container initialized");

        Ok(Self {
            config,
            bus,
            chains,
            mempools,
            blob_store,
            master_index,
            consensus_managers,
        })
    }

    #[must_use]
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    #[must_use]
    pub fn bus(&self) -> Arc<InMemoryEventBus> {
        self.bus.clone()
    }

    #[must_use]
    pub fn chains(&self) -> Arc<ChainRegistry> {
        self.chains.clone()
    }

    #[must_use]
    pub fn mempools(&self) -> Arc<MempoolRegistry> {
        self.mempools.clone()
    }

    #[must_use]
    pub fn blob_store(&self) -> Arc<dyn BlobStore> {
        self.blob_store.clone()
    }

    #[must_use]
    pub fn master_index(&self) -> Arc<MasterIndexStore> {
        self.master_index.clone()
    }

    /// The consensus manager for `chain_id`, created lazily on first access
    /// (spec.md Section 4.6, "one instance per chain (lazy-created)").
    #[must_use]
    pub fn consensus_manager(&self, chain_id: &str) -> Arc<ConsensusManager> {
        self.consensus_managers.get_or_create(chain_id)
    }

    /// `CreateChain` (spec.md Section 4.3): registers a fresh chain with a
    /// genesis block and seeds its reward pool.
    pub fn create_chain(
        &self,
        id: impl Into<ChainId>,
        genesis_prompt: impl Into<String>,
        reward_pool: u64,
        timestamp: u64,
    ) -> Result<Arc<ChainHandle>, LedgerError> {
        self.chains.create_chain(id.into(), genesis_prompt.into(), reward_pool, timestamp)
    }

    /// Registers a validator on `chain_id` and spawns its discussion-trigger
    /// listener (spec.md Section 4.5). Round timing is derived from this
    /// process's consensus configuration so validators and the driving
    /// manager never disagree on `R`/`RoundDuration`.
    #[must_use]
    pub fn register_validator(
        &self,
        chain_id: impl Into<ChainId>,
        profile: ValidatorProfile,
        oracle: Arc<dyn Oracle>,
    ) -> Arc<ValidatorHandle> {
        let timing = RoundTiming::new(self.config.consensus.rounds, self.config.consensus.round_duration);
        let validator = ValidatorHandle::new(profile, chain_id.into(), oracle, self.bus.clone(), timing);
        validator.spawn_listener();
        validator
    }

    /// `ProposeTransaction` (spec.md Section 4.3).
    pub async fn propose_transaction(
        &self,
        verifier: &dyn SignatureVerifier,
        tx: Transaction,
    ) -> Result<(), LedgerError> {
        propose_transaction(&self.chains, &self.mempools, self.bus.as_ref(), verifier, tx).await
    }
}
