//! Consensus manager error kinds.

use thiserror::Error;

/// Errors returned by [`crate::manager::ConsensusManager`] operations.
///
/// Reference: spec.md Section 7 — `InProgress` is surfaced verbatim to the
/// caller of `Propose`; the remaining variants describe internal driver
/// failures that are logged and downgraded rather than propagated, but are
/// still named here so tests can assert on them directly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("block chain id {block_chain} does not match manager chain {manager_chain}")]
    WrongChain { block_chain: String, manager_chain: String },

    #[error("a deliberation is already in progress for this chain")]
    InProgress,

    #[error("invalid block linkage: {0}")]
    InvalidBlockLinkage(String),
}
