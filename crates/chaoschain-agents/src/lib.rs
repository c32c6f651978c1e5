//! # ChaosChain Agents
//!
//! Stateful validator agents: registered identity plus mutable mood,
//! relationships, and policy; subscribes to discussion triggers and
//! generates per-round utterances and a final vote through the Oracle
//! (spec.md Section 4.5).

pub mod config;
pub mod domain;
pub mod parsing;
pub mod prompt;
pub mod validator;

pub use config::RoundTiming;
pub use domain::errors::AgentError;
pub use domain::identity::ValidatorProfile;
pub use domain::state::{BribeOffer, ValidatorState};
pub use validator::ValidatorHandle;
