//! Deadline wrapper around any `Oracle`.
//!
//! Reference: spec.md Section 6, `OracleDeadline` — "implementation-specific,
//! recommended 30s"; spec.md Section 5 notes the oracle call is unbounded in
//! principle and implementations SHOULD impose a per-call deadline.

use crate::errors::OracleError;
use crate::oracle::Oracle;
use async_trait::async_trait;
use std::time::Duration;

/// Recommended default deadline for one `Oracle::ask` call.
pub const DEFAULT_ORACLE_DEADLINE: Duration = Duration::from_secs(30);

/// Wraps an inner oracle with a wall-clock deadline, converting a timed-out
/// call into `OracleError::Timeout` rather than hanging the validator's
/// round loop forever.
pub struct TimeoutOracle<O> {
    inner: O,
    deadline: Duration,
}

impl<O: Oracle> TimeoutOracle<O> {
    #[must_use]
    pub fn new(inner: O, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    #[must_use]
    pub fn with_default_deadline(inner: O) -> Self {
        Self::new(inner, DEFAULT_ORACLE_DEADLINE)
    }
}

#[async_trait]
impl<O: Oracle> Oracle for TimeoutOracle<O> {
    async fn ask(&self, prompt: &str) -> Result<String, OracleError> {
        match tokio::time::timeout(self.deadline, self.inner.ask(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(OracleError::Timeout),
        }
    }
}
