//! Oracle error kinds.

use thiserror::Error;

/// Errors surfaced by an `Oracle` adapter.
///
/// Reference: spec.md Section 4.8 — the oracle interface is purely
/// textual; these variants describe transport/availability failures only.
/// Malformed (but present) text is never an error here: parsing and
/// defaulting for adversarial output lives in the validator agent, not the
/// oracle adapter (spec.md Section 9).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("oracle call exceeded its deadline")]
    Timeout,

    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}
