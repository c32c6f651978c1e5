//! Reward accounting (spec.md Section 4.7).
//!
//! Applied only when the chain appends an accepted block. Default recipient
//! policy credits the full reward to the block's proposer; a transaction's
//! `data` field may carry a recipient split, which is an extension point
//! the original leaves open rather than forbids.

use super::funds::ChainFunds;
use chaoschain_types::{Block, Transaction, TransactionType};
use tracing::warn;

/// Applies every `REWARD` transaction in `block` against `funds`.
///
/// A malformed or unaffordable reward transaction is skipped with a logged
/// warning rather than aborting the whole block: the block has already been
/// accepted by deliberation, and one bad reward line must not roll that
/// back. Non-reward transactions are untouched here; standard transfer
/// semantics are out of scope for this core (spec.md Section 4.7).
pub fn apply_block_rewards(block: &Block, funds: &mut ChainFunds) {
    for tx in &block.txs {
        if tx.tx_type != TransactionType::Reward {
            continue;
        }
        if let Err(reason) = apply_reward_tx(tx, block, funds) {
            warn!(
                chain_id = %block.chain_id,
                height = block.height,
                reason = %reason,
                "skipping reward transaction"
            );
        }
    }
}

fn apply_reward_tx(tx: &Transaction, block: &Block, funds: &mut ChainFunds) -> Result<(), String> {
    if tx.from != Transaction::CHAIN_SENDER {
        return Err(format!("sender must be {}, got {}", Transaction::CHAIN_SENDER, tx.from));
    }
    if tx.reward == 0 {
        return Err("reward must be positive".to_string());
    }
    if tx.chain_id != block.chain_id {
        return Err(format!("tx chain {} does not match block chain {}", tx.chain_id, block.chain_id));
    }

    let recipient = if tx.to.is_empty() { &block.proposer } else { &tx.to };
    funds
        .credit(recipient, tx.reward)
        .map_err(|available| format!("insufficient funds: pool has {available}, needs {}", tx.reward))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reward_tx(chain: &str, to: &str, reward: u64) -> Transaction {
        Transaction {
            tx_type: TransactionType::Reward,
            from: Transaction::CHAIN_SENDER.to_string(),
            to: to.to_string(),
            amount: 0,
            fee: 0,
            content: String::new(),
            reward,
            timestamp: 0,
            signature: String::new(),
            public_key: String::new(),
            chain_id: chain.to_string(),
            data: Vec::new(),
        }
    }

    fn block_with(txs: Vec<Transaction>) -> Block {
        Block {
            height: 1,
            prev_hash: "deadbeef".into(),
            txs,
            timestamp: 0,
            proposer: "proposer-1".into(),
            chain_id: "chain-a".into(),
            signature: String::new(),
        }
    }

    #[test]
    fn reward_credits_named_recipient() {
        let mut funds = ChainFunds::new(100);
        let block = block_with(vec![reward_tx("chain-a", "validator-1", 30)]);
        apply_block_rewards(&block, &mut funds);
        assert_eq!(funds.balance_of("validator-1"), 30);
        assert_eq!(funds.total_funds(), 70);
    }

    #[test]
    fn reward_defaults_to_proposer_when_recipient_empty() {
        let mut funds = ChainFunds::new(100);
        let block = block_with(vec![reward_tx("chain-a", "", 30)]);
        apply_block_rewards(&block, &mut funds);
        assert_eq!(funds.balance_of("proposer-1"), 30);
    }

    #[test]
    fn overdraft_reward_is_skipped_without_panicking() {
        let mut funds = ChainFunds::new(10);
        let block = block_with(vec![reward_tx("chain-a", "validator-1", 20)]);
        apply_block_rewards(&block, &mut funds);
        assert_eq!(funds.balance_of("validator-1"), 0);
        assert_eq!(funds.total_funds(), 10);
    }

    #[test]
    fn non_reward_transactions_are_ignored() {
        let mut funds = ChainFunds::new(100);
        let mut tx = reward_tx("chain-a", "validator-1", 30);
        tx.tx_type = TransactionType::Transfer;
        let block = block_with(vec![tx]);
        apply_block_rewards(&block, &mut funds);
        assert_eq!(funds.total_funds(), 100);
    }
}
