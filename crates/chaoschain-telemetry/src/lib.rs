//! # ChaosChain Telemetry
//!
//! Structured logging (`tracing`) and process metrics (`prometheus`) shared
//! by every crate in the deliberative consensus core. No remote exporter is
//! wired in here: this core has no network service boundary of its own to
//! export from, so the scraping/shipping half of a full observability stack
//! (OTel collector, Loki) is left to whatever embeds it.

pub mod config;
pub mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, LoggingError};
pub use metrics::{register_metrics, MetricsError};

use prometheus::Registry;

/// Everything a process needs to start emitting telemetry: a logging
/// subscriber is installed as a side effect, and a metrics `Registry` is
/// handed back for the caller to expose (e.g. behind an HTTP `/metrics`
/// route, or scraped directly in tests).
pub struct Telemetry {
    pub registry: Registry,
}

/// Initialize logging and metrics registration in one call.
///
/// Mirrors the bootstrap sequence in `node-runtime`'s container setup: logs
/// come up first so subsequent registration failures are observable.
pub fn init(config: &TelemetryConfig) -> Result<Telemetry, TelemetryError> {
    init_logging(config)?;
    let registry = register_metrics()?;
    Ok(Telemetry { registry })
}

/// Errors bringing up the telemetry stack.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_brings_up_logging_and_metrics() {
        let config = TelemetryConfig::default();
        let telemetry = init(&config).expect("telemetry init");
        assert!(!telemetry.registry.gather().is_empty());
    }
}
