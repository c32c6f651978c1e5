//! # ChaosChain Ledger
//!
//! Per-chain blockchain state, reward accounting, and the process-wide
//! chain registry (spec.md Section 4, **Chain**). Owns `AppendBlock` and
//! `ProposeTransaction`; block acceptance itself is decided upstream by
//! consensus and handed here only to be recorded.

pub mod domain;
pub mod propose;
pub mod registry;

pub use domain::chain::ChainState;
pub use domain::errors::{LedgerError, RewardError};
pub use domain::funds::ChainFunds;
pub use domain::rewards::apply_block_rewards;
pub use propose::propose_transaction;
pub use registry::{ChainHandle, ChainRegistry};
