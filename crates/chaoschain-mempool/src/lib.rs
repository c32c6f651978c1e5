//! # ChaosChain Mempool
//!
//! Per-chain pending transaction pool plus ephemeral per-round deliberation
//! state (spec.md Section 4.4). No block-building auction lives here: this
//! core decides acceptance by deliberation, not by who pays the highest
//! fee, so the priority-queue and RBF machinery a block-production mempool
//! needs is deliberately absent.

pub mod domain;
pub mod ports;
pub mod registry;

pub use domain::entities::EphemeralState;
pub use domain::errors::MempoolError;
pub use domain::pool::Mempool;
pub use ports::{AcceptAllVerifier, SignatureVerifier};
pub use registry::MempoolRegistry;
