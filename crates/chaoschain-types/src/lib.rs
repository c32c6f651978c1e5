//! # ChaosChain Types
//!
//! Single source of truth for domain entities shared across the
//! deliberative consensus core: chains, blocks, transactions, and the
//! discussion/vote records that make up a deliberation transcript.
//!
//! Every other crate in this workspace depends on this one rather than
//! redefining these types locally.

pub mod entities;

pub use entities::{
    hash_to_hex, Block, ChainId, Discussion, DiscussionType, Hash, Transaction, TransactionError,
    TransactionType, ValidatorId, GENESIS_PREV_HASH,
};
