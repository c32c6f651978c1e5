//! Structured logging initialization.

use crate::config::TelemetryConfig;
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// Errors initializing the logging subsystem.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to install global tracing subscriber: {0}")]
    Install(String),
}

/// Install a process-wide `tracing` subscriber honoring `TelemetryConfig`.
///
/// Idempotent in tests: repeated calls from multiple `#[test]` functions in
/// the same binary are tolerated (the second+ install attempt is ignored
/// rather than panicking).
pub fn init_logging(config: &TelemetryConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false);

    let result = if config.json_logs {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    // A prior `try_init` call in the same process (common across tests) is
    // not a real failure; only report genuine install errors.
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.to_string().contains("already") => Ok(()),
        Err(e) => Err(LoggingError::Install(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        let config = TelemetryConfig::default();
        assert!(init_logging(&config).is_ok());
        assert!(init_logging(&config).is_ok());
    }
}
