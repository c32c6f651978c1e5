//! Ledger error kinds.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("chain {0} already exists")]
    ChainExists(String),

    #[error("chain {0} not found")]
    ChainNotFound(String),

    #[error("block height {got} does not match expected {expected}")]
    WrongHeight { got: u64, expected: u64 },

    #[error("block prev_hash does not match tail block hash")]
    WrongPrevHash,

    #[error("block height must be greater than zero for AppendBlock")]
    NotNonGenesis,

    #[error("block chain id {block_chain} does not match ledger chain {ledger_chain}")]
    WrongChain { block_chain: String, ledger_chain: String },

    #[error("transaction chain id {tx_chain} does not match target chain {target_chain}")]
    TxWrongChain { tx_chain: String, target_chain: String },

    #[error("transaction signature failed verification")]
    InvalidSignature,

    #[error("mempool rejected transaction: {0}")]
    MempoolRejected(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RewardError {
    #[error("reward transaction sender must be {expected}, got {got}")]
    InvalidSender { expected: String, got: String },

    #[error("reward amount must be positive")]
    NonPositiveReward,

    #[error("reward transaction chain id {tx_chain} does not match ledger chain {ledger_chain}")]
    WrongChain { tx_chain: String, ledger_chain: String },

    #[error("insufficient funds: pool has {available}, reward requires {requested}")]
    InsufficientFunds { available: u64, requested: u64 },
}
