//! Per-chain blockchain state: finalized blocks, genesis context, funds.

use super::errors::LedgerError;
use super::funds::ChainFunds;
use super::rewards::apply_block_rewards;
use chaoschain_mempool::Mempool;
use chaoschain_types::{Block, ChainId};
use std::collections::HashSet;

/// Ordered sequence of finalized blocks for one chain, plus the immutable
/// genesis context and the chain's reward fund pool (spec.md Section 3,
/// **Chain**).
///
/// Does not hold its mempool directly: per the lock-ordering and
/// cycle-breaking discipline (spec.md Section 9), the chain only knows its
/// own id; callers resolve the matching `Mempool` through a separate
/// registry and pass it in to `append_block`.
pub struct ChainState {
    id: ChainId,
    genesis_prompt: String,
    blocks: Vec<Block>,
    funds: ChainFunds,
    peer_set: HashSet<String>,
}

impl ChainState {
    /// Creates a chain with a fresh genesis block at height 0.
    pub fn new(id: ChainId, genesis_prompt: String, reward_pool: u64, timestamp: u64) -> Self {
        let genesis = Block::genesis(id.clone(), timestamp);
        Self {
            id,
            genesis_prompt,
            blocks: vec![genesis],
            funds: ChainFunds::new(reward_pool),
            peer_set: HashSet::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn genesis_prompt(&self) -> &str {
        &self.genesis_prompt
    }

    pub fn height(&self) -> u64 {
        self.blocks.len() as u64
    }

    pub fn tail(&self) -> &Block {
        self.blocks.last().expect("genesis block always present")
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn funds(&self) -> &ChainFunds {
        &self.funds
    }

    pub fn register_peer(&mut self, peer_id: String) {
        self.peer_set.insert(peer_id);
    }

    pub fn peers(&self) -> &HashSet<String> {
        &self.peer_set
    }

    /// Appends an accepted block. Enforces chain id, strict height
    /// succession, and prev-hash linkage to the current tail, and rejects
    /// height 0 (genesis is never appended, only created). On success,
    /// applies reward accounting and removes the block's transactions from
    /// `mempool`.
    pub fn append_block(&mut self, block: Block, mempool: &mut Mempool) -> Result<(), LedgerError> {
        if block.chain_id != self.id {
            return Err(LedgerError::WrongChain {
                block_chain: block.chain_id,
                ledger_chain: self.id.clone(),
            });
        }
        if block.height == 0 {
            return Err(LedgerError::NotNonGenesis);
        }
        let expected_height = self.height();
        if block.height != expected_height {
            return Err(LedgerError::WrongHeight {
                got: block.height,
                expected: expected_height,
            });
        }
        if block.prev_hash != self.tail().hash_hex() {
            return Err(LedgerError::WrongPrevHash);
        }

        apply_block_rewards(&block, &mut self.funds);
        for tx in &block.txs {
            let _ = mempool.remove(tx);
        }
        self.blocks.push(block);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_chain_starts_at_height_one_block() {
        let chain = ChainState::new("chain-a".into(), "be good".into(), 1000, 0);
        assert_eq!(chain.height(), 1);
        assert!(chain.tail().is_genesis());
    }

    #[test]
    fn append_block_requires_matching_prev_hash() {
        let mut chain = ChainState::new("chain-a".into(), "prompt".into(), 1000, 0);
        let mut mempool = Mempool::new("chain-a".into());
        let bad = Block {
            height: 1,
            prev_hash: "wrong".into(),
            txs: vec![],
            timestamp: 1,
            proposer: "p".into(),
            chain_id: "chain-a".into(),
            signature: String::new(),
        };
        assert_eq!(
            chain.append_block(bad, &mut mempool).unwrap_err(),
            LedgerError::WrongPrevHash
        );
    }

    #[test]
    fn append_block_succeeds_with_correct_linkage() {
        let mut chain = ChainState::new("chain-a".into(), "prompt".into(), 1000, 0);
        let mut mempool = Mempool::new("chain-a".into());
        let good = Block {
            height: 1,
            prev_hash: chain.tail().hash_hex(),
            txs: vec![],
            timestamp: 1,
            proposer: "p".into(),
            chain_id: "chain-a".into(),
            signature: String::new(),
        };
        chain.append_block(good, &mut mempool).unwrap();
        assert_eq!(chain.height(), 2);
    }

    #[test]
    fn append_block_rejects_height_zero() {
        let mut chain = ChainState::new("chain-a".into(), "prompt".into(), 1000, 0);
        let mut mempool = Mempool::new("chain-a".into());
        let genesis_again = Block {
            height: 0,
            prev_hash: "0".into(),
            txs: vec![],
            timestamp: 0,
            proposer: "p".into(),
            chain_id: "chain-a".into(),
            signature: String::new(),
        };
        assert_eq!(
            chain.append_block(genesis_again, &mut mempool).unwrap_err(),
            LedgerError::NotNonGenesis
        );
    }
}
