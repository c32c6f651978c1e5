//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for the logging + metrics stack.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line.
    pub service_name: String,
    /// Log level filter (trace, debug, info, warn, error).
    pub log_level: String,
    /// Whether to emit JSON-formatted logs (vs. human-readable).
    pub json_logs: bool,
    /// Prometheus metrics port, if the process exposes a `/metrics` endpoint.
    pub metrics_port: u16,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "chaoschain".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            metrics_port: 9100,
        }
    }
}

impl TelemetryConfig {
    /// Build configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CHAOSCHAIN_SERVICE_NAME` (default: `chaoschain`)
    /// - `CHAOSCHAIN_LOG_LEVEL` or `RUST_LOG` (default: `info`)
    /// - `CHAOSCHAIN_JSON_LOGS` (default: `false`)
    /// - `CHAOSCHAIN_METRICS_PORT` (default: `9100`)
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("CHAOSCHAIN_SERVICE_NAME")
                .unwrap_or_else(|_| "chaoschain".to_string()),
            log_level: env::var("CHAOSCHAIN_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),
            json_logs: env::var("CHAOSCHAIN_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
            metrics_port: env::var("CHAOSCHAIN_METRICS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(9100),
        }
    }
}
