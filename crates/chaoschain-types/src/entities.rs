//! Core domain entities shared across the deliberative consensus core.
//!
//! Mirrors the "single source of truth for type definitions" role that
//! `shared-types` plays for the rest of the workspace: every crate in this
//! repo imports its `Block`, `Transaction`, and `Hash` from here rather than
//! redefining them.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 32-byte content digest (SHA-256).
pub type Hash = [u8; 32];

/// The distinguished sentinel used as `PrevHash` for every chain's genesis
/// block. Not a real digest.
pub const GENESIS_PREV_HASH: &str = "0";

/// Render a `Hash` as a lowercase hex string.
#[must_use]
pub fn hash_to_hex(h: &Hash) -> String {
    h.iter().map(|b| format!("{b:02x}")).collect()
}

/// Chain identifier. Non-empty by construction at the registry boundary.
pub type ChainId = String;

/// Validator identifier, stable for the lifetime of a validator's
/// registration on a chain.
pub type ValidatorId = String;

/// Kinds of transaction the core recognizes on-chain.
///
/// Reference: spec.md Section 3, Transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    /// A plain value transfer between two accounts.
    Transfer,
    /// A chain-funded reward, applied by Reward Accounting on block apply.
    Reward,
    /// Delegation of a task to an agent (content-carrying, no fund movement
    /// at apply time).
    TaskDelegation,
    /// Review of completed work, referencing a prior delegation.
    WorkReview,
    /// Distribution of a previously escrowed reward across recipients.
    RewardDistribution,
    /// Registration of a new validator identity on-chain.
    RegisterValidator,
}

/// A single transaction, pending or already included in a block.
///
/// Reference: spec.md Section 3, Transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub tx_type: TransactionType,
    pub from: String,
    pub to: String,
    pub amount: u64,
    pub fee: u64,
    pub content: String,
    /// Reward amount, meaningful only when `tx_type == Reward`.
    pub reward: u64,
    pub timestamp: u64,
    pub signature: String,
    pub public_key: String,
    pub chain_id: ChainId,
    pub data: Vec<u8>,
}

impl Transaction {
    /// `sender == "CHAIN"` is the only valid `From` for reward transactions.
    pub const CHAIN_SENDER: &'static str = "CHAIN";

    /// Structural invariants independent of chain or mempool state:
    /// amount is non-negative (guaranteed by `u64`), and reward transactions
    /// originate from the chain itself with a positive reward.
    ///
    /// Reference: spec.md Section 3, Transaction invariants.
    pub fn validate_structure(&self) -> Result<(), TransactionError> {
        if self.tx_type == TransactionType::Reward {
            if self.from != Self::CHAIN_SENDER {
                return Err(TransactionError::InvalidRewardSender);
            }
            if self.reward == 0 {
                return Err(TransactionError::NonPositiveReward);
            }
        }
        Ok(())
    }

    /// Deterministic fingerprint used for mempool dedup. In production this
    /// would be the signature; we hash the signature plus chain id so two
    /// identical test signatures on different chains never collide.
    #[must_use]
    pub fn fingerprint(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.chain_id.as_bytes());
        hasher.update(self.signature.as_bytes());
        hasher.finalize().into()
    }
}

/// Errors describing a structurally invalid transaction.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("reward transactions must originate from CHAIN")]
    InvalidRewardSender,
    #[error("reward transactions must carry a positive reward")]
    NonPositiveReward,
    #[error("transaction chain_id does not match target chain")]
    WrongChain,
}

/// A finalized or proposed block.
///
/// Reference: spec.md Section 3, Block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    pub prev_hash: String,
    pub txs: Vec<Transaction>,
    pub timestamp: u64,
    pub proposer: String,
    pub chain_id: ChainId,
    pub signature: String,
}

impl Block {
    /// Build the literal genesis block for a chain: height 0, sentinel
    /// parent hash, no transactions.
    #[must_use]
    pub fn genesis(chain_id: ChainId, timestamp: u64) -> Self {
        Self {
            height: 0,
            prev_hash: GENESIS_PREV_HASH.to_string(),
            txs: Vec::new(),
            timestamp,
            proposer: "GENESIS".to_string(),
            chain_id,
            signature: String::new(),
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.height == 0 && self.prev_hash == GENESIS_PREV_HASH
    }

    /// Stable digest over every field, used as this block's identity and as
    /// the next block's expected `prev_hash`.
    #[must_use]
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.height.to_le_bytes());
        hasher.update(self.prev_hash.as_bytes());
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update(self.proposer.as_bytes());
        hasher.update(self.chain_id.as_bytes());
        hasher.update(self.signature.as_bytes());
        for tx in &self.txs {
            hasher.update(tx.fingerprint());
        }
        hasher.finalize().into()
    }

    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash())
    }
}

/// The stance a validator takes in one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscussionType {
    Support,
    Oppose,
    Question,
    Comment,
}

impl DiscussionType {
    /// Parse the oracle's uppercase stance token. Returns `None` if neither
    /// token is present, letting the caller apply its own default.
    #[must_use]
    pub fn from_stance_token(text: &str) -> Option<Self> {
        let upper = text.to_uppercase();
        if upper.contains("SUPPORT") {
            Some(Self::Support)
        } else if upper.contains("OPPOSE") {
            Some(Self::Oppose)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_final_vote_type(self) -> bool {
        matches!(self, Self::Support | Self::Oppose)
    }
}

impl fmt::Display for DiscussionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Support => "support",
            Self::Oppose => "oppose",
            Self::Question => "question",
            Self::Comment => "comment",
        };
        write!(f, "{s}")
    }
}

/// One validator utterance within a deliberation.
///
/// Reference: spec.md Section 3, Discussion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discussion {
    pub id: String,
    pub validator_id: ValidatorId,
    pub validator_name: String,
    pub message: String,
    pub discussion_type: DiscussionType,
    pub round: u32,
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx(chain_id: &str, sig: &str) -> Transaction {
        Transaction {
            tx_type: TransactionType::Transfer,
            from: "alice".into(),
            to: "bob".into(),
            amount: 10,
            fee: 1,
            content: String::new(),
            reward: 0,
            timestamp: 1,
            signature: sig.into(),
            public_key: String::new(),
            chain_id: chain_id.to_string(),
            data: vec![],
        }
    }

    #[test]
    fn genesis_block_has_sentinel_parent() {
        let g = Block::genesis("c1".to_string(), 0);
        assert!(g.is_genesis());
        assert_eq!(g.prev_hash, "0");
        assert_eq!(g.height, 0);
        assert!(g.txs.is_empty());
    }

    #[test]
    fn reward_transaction_requires_chain_sender_and_positive_reward() {
        let mut tx = sample_tx("c1", "sig");
        tx.tx_type = TransactionType::Reward;
        assert_eq!(
            tx.validate_structure(),
            Err(TransactionError::InvalidRewardSender)
        );

        tx.from = Transaction::CHAIN_SENDER.to_string();
        assert_eq!(
            tx.validate_structure(),
            Err(TransactionError::NonPositiveReward)
        );

        tx.reward = 100;
        assert!(tx.validate_structure().is_ok());
    }

    #[test]
    fn fingerprints_differ_across_chains_for_same_signature() {
        let a = sample_tx("c1", "sig");
        let b = sample_tx("c2", "sig");
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn block_hash_changes_with_any_field() {
        let mut b1 = Block::genesis("c1".to_string(), 100);
        b1.height = 1;
        b1.prev_hash = "deadbeef".into();
        let b2 = Block {
            proposer: "someone-else".into(),
            ..b1.clone()
        };
        assert_ne!(b1.hash(), b2.hash());
    }

    #[test]
    fn stance_token_parsing_prefers_explicit_tokens() {
        assert_eq!(
            DiscussionType::from_stance_token("I SUPPORT this block"),
            Some(DiscussionType::Support)
        );
        assert_eq!(
            DiscussionType::from_stance_token("i oppose this"),
            Some(DiscussionType::Oppose)
        );
        assert_eq!(DiscussionType::from_stance_token("garbage"), None);
    }
}
