//! Ephemeral, per-deliberation state carried alongside the persistent pool.

use chaoschain_types::{ChainId, Discussion, Hash, ValidatorId};
use std::collections::HashMap;

/// Vote and discussion events recorded for the currently active deliberation.
///
/// Cleared by [`ClearEphemeralData`](super::pool::Mempool::clear_ephemeral_data)
/// whenever a deliberation terminates; never touches the persistent
/// transaction set.
#[derive(Debug, Default, Clone)]
pub struct EphemeralState {
    pub votes: Vec<Discussion>,
    pub agent_identities: HashMap<ValidatorId, String>,
    pub block_hashes: Vec<Hash>,
}

impl EphemeralState {
    pub fn clear(&mut self) {
        self.votes.clear();
        self.agent_identities.clear();
        self.block_hashes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty() && self.agent_identities.is_empty() && self.block_hashes.is_empty()
    }
}

/// Identifies which chain a mempool instance belongs to, used to reject
/// cross-chain transaction submissions at the door.
pub type Owner = ChainId;
