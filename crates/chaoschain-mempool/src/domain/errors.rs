//! Mempool error kinds.

use thiserror::Error;

/// Errors returned by [`crate::domain::pool::Mempool`] operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MempoolError {
    #[error("transaction chain id {tx_chain} does not match mempool chain {pool_chain}")]
    WrongChain { tx_chain: String, pool_chain: String },

    #[error("transaction signature failed verification")]
    InvalidSignature,

    #[error("transaction with fingerprint {0:x?} already present")]
    Duplicate(String),

    #[error("no transaction with fingerprint {0} pending")]
    NotFound(String),
}
