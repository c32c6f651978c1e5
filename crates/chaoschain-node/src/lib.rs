//! # ChaosChain Node
//!
//! Process bootstrap and wiring for the Deliberative Consensus Core
//! (spec.md Section 2): composes `chaoschain-bus`, `chaoschain-ledger`,
//! `chaoschain-mempool`, `chaoschain-transcripts`, `chaoschain-consensus`,
//! and `chaoschain-agents` into one running process, and exposes the
//! narrow external-adapter facades (`ProposalIngress`, `ObserverStream`)
//! the HTTP/WS surface, CLI, and peer network would sit behind — all of
//! which remain out of this core's scope (spec.md Section 1).

pub mod config;
pub mod container;
pub mod ingress;
pub mod observer;

pub use config::NodeConfig;
pub use container::NodeContainer;
pub use ingress::{ProposalIngress, ProposeOutcome};
pub use observer::ObserverStream;
