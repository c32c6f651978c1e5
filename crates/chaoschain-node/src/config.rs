//! Process-wide node configuration.
//!
//! Reference: `node_runtime::container::config::NodeConfig` — a small struct
//! of struct, one field per subsystem, each with `Default` and an
//! environment-driven override. Trimmed to what this core's wiring actually
//! needs: the consensus timing/quorum config (spec.md Section 6) and where
//! the master index config file lives on disk (spec.md Section 4.2).

use chaoschain_consensus::ConsensusConfig;
use chaoschain_telemetry::TelemetryConfig;
use std::env;
use std::path::PathBuf;

/// Everything needed to bring up one process hosting any number of chains.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Round count, timing, and quorum rule applied to every chain's
    /// consensus manager.
    pub consensus: ConsensusConfig,
    /// Logging and metrics configuration.
    pub telemetry: TelemetryConfig,
    /// Directory holding the master index config file and, when using the
    /// file-backed blob store, the blob directory (spec.md Section 6,
    /// "Persisted state").
    pub data_dir: PathBuf,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            consensus: ConsensusConfig::default(),
            telemetry: TelemetryConfig::default(),
            data_dir: default_data_dir(),
        }
    }
}

impl NodeConfig {
    /// Builds configuration from environment variables, falling back to
    /// `Default` for anything unset.
    ///
    /// # Environment Variables
    ///
    /// - `CHAOSCHAIN_DATA_DIR` (default: `$HOME/.chaoschain`)
    /// - plus every variable `ConsensusConfig::from_env` and
    ///   `TelemetryConfig::from_env` read.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            consensus: ConsensusConfig::from_env(),
            telemetry: TelemetryConfig::from_env(),
            data_dir: env::var("CHAOSCHAIN_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_data_dir()),
        }
    }
}

/// `$HOME/.chaoschain`, per spec.md Section 6's default config file location.
fn default_data_dir() -> PathBuf {
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".chaoschain")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_nest_subsystem_defaults() {
        let config = NodeConfig::default();
        assert_eq!(config.consensus.rounds, 5);
        assert_eq!(config.telemetry.log_level, "info");
    }
}
