//! Process-wide chain registry.
//!
//! Reference: `node-runtime::registry::SubsystemRegistry` — a named mapping
//! guarded by a read/write lock, exposed through `Init`/`Get`/`List`
//! operations rather than implicit global state (spec.md Section 9).

use crate::domain::chain::ChainState;
use crate::domain::errors::LedgerError;
use chaoschain_types::ChainId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// A chain's state behind its own lock, so chain operations never need to
/// hold the registry lock while mutating blocks or funds.
pub struct ChainHandle {
    state: RwLock<ChainState>,
}

impl ChainHandle {
    pub fn state(&self) -> &RwLock<ChainState> {
        &self.state
    }
}

/// The process-wide map of `ChainID -> ChainHandle`.
#[derive(Default)]
pub struct ChainRegistry {
    chains: RwLock<HashMap<ChainId, Arc<ChainHandle>>>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain with a fresh genesis block and registers it.
    /// Fails with `ChainExists` on duplicate id.
    pub fn create_chain(
        &self,
        id: ChainId,
        genesis_prompt: String,
        reward_pool: u64,
        timestamp: u64,
    ) -> Result<Arc<ChainHandle>, LedgerError> {
        let mut chains = self.chains.write();
        if chains.contains_key(&id) {
            return Err(LedgerError::ChainExists(id));
        }
        let handle = Arc::new(ChainHandle {
            state: RwLock::new(ChainState::new(id.clone(), genesis_prompt, reward_pool, timestamp)),
        });
        info!(chain_id = %id, "chain registered");
        chains.insert(id, Arc::clone(&handle));
        Ok(handle)
    }

    pub fn get_chain(&self, id: &str) -> Result<Arc<ChainHandle>, LedgerError> {
        self.chains
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::ChainNotFound(id.to_string()))
    }

    pub fn list_chains(&self) -> Vec<ChainId> {
        self.chains.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_chain_rejects_duplicate_id() {
        let registry = ChainRegistry::new();
        registry
            .create_chain("chain-a".into(), "prompt".into(), 100, 0)
            .unwrap();
        let err = registry
            .create_chain("chain-a".into(), "prompt".into(), 100, 0)
            .unwrap_err();
        assert_eq!(err, LedgerError::ChainExists("chain-a".into()));
    }

    #[test]
    fn get_chain_not_found() {
        let registry = ChainRegistry::new();
        assert_eq!(
            registry.get_chain("missing").unwrap_err(),
            LedgerError::ChainNotFound("missing".into())
        );
    }

    #[test]
    fn list_chains_reflects_registrations() {
        let registry = ChainRegistry::new();
        registry.create_chain("a".into(), "p".into(), 0, 0).unwrap();
        registry.create_chain("b".into(), "p".into(), 0, 0).unwrap();
        let mut ids = registry.list_chains();
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }
}
