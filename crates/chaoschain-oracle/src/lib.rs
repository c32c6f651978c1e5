//! # ChaosChain Oracle
//!
//! The single textual LLM capability the core depends on (spec.md Section
//! 4.8): `Oracle::ask(prompt) -> text`. Determinism and model choice are
//! explicitly out of scope; this crate only defines the trait boundary, a
//! deadline wrapper, and deterministic test doubles.

pub mod errors;
pub mod oracle;
pub mod scripted;
pub mod timeout;

pub use errors::OracleError;
pub use oracle::Oracle;
pub use scripted::ScriptedOracle;
pub use timeout::{TimeoutOracle, DEFAULT_ORACLE_DEADLINE};
