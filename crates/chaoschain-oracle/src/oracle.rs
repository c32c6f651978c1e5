//! The `Oracle` port: the single LLM capability the core depends on.

use crate::errors::OracleError;
use async_trait::async_trait;

/// Free-form text in, free-form text out. Determinism and model choice are
/// explicitly out of scope for the core (spec.md Section 1); all parsing
/// and defaulting of the response lives in the caller.
///
/// Reference: spec.md Section 4.8, modeled on
/// `qc-08-consensus::ports::outbound::SignatureVerifier`'s single-capability
/// trait shape.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn ask(&self, prompt: &str) -> Result<String, OracleError>;
}
