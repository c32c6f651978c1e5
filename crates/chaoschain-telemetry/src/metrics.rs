//! Prometheus metrics for the deliberative consensus core.

use lazy_static::lazy_static;
use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use thiserror::Error;

lazy_static! {
    /// Deliberations that reached `InDiscussion`, labeled by chain.
    pub static ref DELIBERATIONS_STARTED: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "chaoschain_deliberations_started_total",
            "Deliberations started, by chain"
        ),
        &["chain_id"],
    )
    .expect("metric construction");

    /// Deliberations that finished `Accepted`.
    pub static ref DELIBERATIONS_ACCEPTED: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "chaoschain_deliberations_accepted_total",
            "Deliberations accepted, by chain"
        ),
        &["chain_id"],
    )
    .expect("metric construction");

    /// Deliberations that finished `Rejected`.
    pub static ref DELIBERATIONS_REJECTED: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "chaoschain_deliberations_rejected_total",
            "Deliberations rejected, by chain"
        ),
        &["chain_id"],
    )
    .expect("metric construction");

    /// Final-round validator votes tallied across all deliberations.
    pub static ref VOTES_TALLIED: IntCounter = IntCounter::new(
        "chaoschain_votes_tallied_total",
        "Final-round votes counted into a tally"
    )
    .expect("metric construction");

    /// Oracle responses that failed lenient parsing and were defaulted.
    pub static ref ORACLE_MALFORMED_RESPONSES: IntCounter = IntCounter::new(
        "chaoschain_oracle_malformed_responses_total",
        "Oracle responses that could not be parsed and were defaulted"
    )
    .expect("metric construction");

    /// Transcript persistence failures (best-effort, never undoes a decision).
    pub static ref TRANSCRIPT_PERSIST_FAILURES: IntCounter = IntCounter::new(
        "chaoschain_transcript_persist_failures_total",
        "Failed attempts to persist a deliberation transcript"
    )
    .expect("metric construction");

    /// Current pending transaction count, labeled by chain.
    pub static ref MEMPOOL_SIZE: IntGauge = IntGauge::new(
        "chaoschain_mempool_size",
        "Current pending transaction count (last-chain-touched snapshot)"
    )
    .expect("metric construction");
}

/// Errors registering metrics with a `Registry`.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to register metric: {0}")]
    Register(#[from] prometheus::Error),
}

/// Register all metrics with a fresh `Registry` and return it.
///
/// Reference: `qc-08-consensus::metrics` and `quantum_telemetry::metrics`
/// register a fixed set of counters/gauges at process start; this mirrors
/// that shape scaled to the deliberation lifecycle.
pub fn register_metrics() -> Result<Registry, MetricsError> {
    let registry = Registry::new();
    registry.register(Box::new(DELIBERATIONS_STARTED.clone()))?;
    registry.register(Box::new(DELIBERATIONS_ACCEPTED.clone()))?;
    registry.register(Box::new(DELIBERATIONS_REJECTED.clone()))?;
    registry.register(Box::new(VOTES_TALLIED.clone()))?;
    registry.register(Box::new(ORACLE_MALFORMED_RESPONSES.clone()))?;
    registry.register(Box::new(TRANSCRIPT_PERSIST_FAILURES.clone()))?;
    registry.register(Box::new(MEMPOOL_SIZE.clone()))?;
    Ok(registry)
}
