//! # ChaosChain Consensus
//!
//! The deliberative consensus core (spec.md Section 4.6): drives one
//! proposed block at a time through bounded discussion rounds, a final
//! vote, majority tallying, and finalization against the ledger, persisting
//! the off-chain transcript along the way. Everything else in this
//! workspace (bus, mempool, ledger, transcripts, agents, oracle) is a
//! collaborator this crate wires together rather than owns.

pub mod config;
pub mod domain;
pub mod manager;
pub mod registry;

pub use config::ConsensusConfig;
pub use domain::deliberation::{Deliberation, DeliberationState};
pub use domain::errors::ConsensusError;
pub use domain::tally::{tally_votes, Tally};
pub use manager::{ConsensusManager, Verdict};
pub use registry::ConsensusManagerRegistry;
