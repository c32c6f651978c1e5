//! Process-wide mempool registry.
//!
//! Mirrors `chaoschain_ledger::registry::ChainRegistry`'s shape: a named
//! mapping guarded by a read/write lock, exposed through `Init`/`Get`/`List`
//! operations (spec.md Section 9). Keyed only by `ChainId`, never by a
//! direct reference to a chain or consensus manager, so the
//! Chain/Mempool/Manager cycle is broken by identity rather than by shared
//! ownership.

use crate::domain::pool::Mempool;
use chaoschain_types::ChainId;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// The process-wide map of `ChainID -> Mempool`.
#[derive(Default)]
pub struct MempoolRegistry {
    pools: RwLock<HashMap<ChainId, Arc<Mutex<Mempool>>>>,
}

impl MempoolRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mempool for `chain_id`, creating an empty one on first
    /// access.
    #[must_use]
    pub fn get_or_create(&self, chain_id: &str) -> Arc<Mutex<Mempool>> {
        if let Some(existing) = self.pools.read().get(chain_id) {
            return Arc::clone(existing);
        }
        let mut pools = self.pools.write();
        Arc::clone(
            pools
                .entry(chain_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(Mempool::new(chain_id.to_string())))),
        )
    }

    #[must_use]
    pub fn get(&self, chain_id: &str) -> Option<Arc<Mutex<Mempool>>> {
        self.pools.read().get(chain_id).cloned()
    }

    #[must_use]
    pub fn list_chains(&self) -> Vec<ChainId> {
        self.pools.read().keys().cloned().collect()
    }
}
