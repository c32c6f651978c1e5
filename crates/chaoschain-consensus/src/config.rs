//! Consensus timing and quorum configuration.
//!
//! Reference: spec.md Section 6, "Configuration options (enumerated)".
//! Mirrors `node_runtime::container::config::ConsensusConfig`'s
//! `Default` + `from_env()` shape, scoped down to the fields this core's
//! driver actually consults.

use std::env;
use std::time::Duration;

/// Round count, timing, and quorum rule for one chain's deliberations.
#[derive(Debug, Clone, Copy)]
pub struct ConsensusConfig {
    /// `R`: number of deliberative rounds before the final vote. Minimum 1.
    pub rounds: u32,
    /// Per-round sleep. Minimum 1s.
    pub round_duration: Duration,
    /// Extra wait after the final round before tallying.
    pub grace_window: Duration,
    /// Minimum number of counted final votes for a decision to be reached
    /// at all; below this the deliberation is rejected for quorum failure.
    pub minimum_validators: usize,
    /// How long a mempool transaction may sit pending before
    /// `ExpireOlderThan` removes it.
    pub mempool_expiry: Duration,
    /// Per-call timeout for `BlobStore::put`/`get`.
    pub blob_store_request_timeout: Duration,
    /// Outer deadline for the blob-store status-polling loop; past this the
    /// transcript is considered lost for the deliberation (spec.md
    /// Section 5).
    pub blob_store_max_wait: Duration,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            rounds: 5,
            round_duration: Duration::from_secs(5),
            grace_window: Duration::from_secs(5),
            minimum_validators: 2,
            mempool_expiry: Duration::from_secs(3600),
            blob_store_request_timeout: Duration::from_secs(30),
            blob_store_max_wait: Duration::from_secs(30 * 60),
        }
    }
}

impl ConsensusConfig {
    /// The round index used for the final vote (`R + 1`).
    #[must_use]
    pub fn final_round(&self) -> u32 {
        self.rounds + 1
    }

    /// Total wall-clock budget the driver waits before tallying:
    /// `(R+1) * RoundDuration + GraceWindow` (spec.md Section 4.6, Step 3).
    #[must_use]
    pub fn driver_wait(&self) -> Duration {
        self.round_duration * (self.rounds + 1) + self.grace_window
    }

    /// Loads configuration from environment variables, falling back to
    /// `Default` for anything unset or unparseable.
    ///
    /// # Environment Variables
    ///
    /// - `CHAOSCHAIN_ROUNDS` (default 5, clamped to minimum 1)
    /// - `CHAOSCHAIN_ROUND_DURATION_MS` (default 5000, clamped to minimum 1000)
    /// - `CHAOSCHAIN_GRACE_WINDOW_MS` (default 5000)
    /// - `CHAOSCHAIN_MINIMUM_VALIDATORS` (default 2)
    /// - `CHAOSCHAIN_MEMPOOL_EXPIRY_SECS` (default 3600)
    /// - `CHAOSCHAIN_BLOB_STORE_TIMEOUT_SECS` (default 30)
    /// - `CHAOSCHAIN_BLOB_STORE_MAX_WAIT_SECS` (default 1800)
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let rounds = env_u32("CHAOSCHAIN_ROUNDS", defaults.rounds).max(1);
        let round_duration_ms =
            env_u64("CHAOSCHAIN_ROUND_DURATION_MS", defaults.round_duration.as_millis() as u64)
                .max(1000);
        let grace_window_ms =
            env_u64("CHAOSCHAIN_GRACE_WINDOW_MS", defaults.grace_window.as_millis() as u64);
        let minimum_validators =
            env_usize("CHAOSCHAIN_MINIMUM_VALIDATORS", defaults.minimum_validators);
        let mempool_expiry_secs =
            env_u64("CHAOSCHAIN_MEMPOOL_EXPIRY_SECS", defaults.mempool_expiry.as_secs());
        let blob_timeout_secs = env_u64(
            "CHAOSCHAIN_BLOB_STORE_TIMEOUT_SECS",
            defaults.blob_store_request_timeout.as_secs(),
        );
        let blob_max_wait_secs = env_u64(
            "CHAOSCHAIN_BLOB_STORE_MAX_WAIT_SECS",
            defaults.blob_store_max_wait.as_secs(),
        );

        Self {
            rounds,
            round_duration: Duration::from_millis(round_duration_ms),
            grace_window: Duration::from_millis(grace_window_ms),
            minimum_validators,
            mempool_expiry: Duration::from_secs(mempool_expiry_secs),
            blob_store_request_timeout: Duration::from_secs(blob_timeout_secs),
            blob_store_max_wait: Duration::from_secs(blob_max_wait_secs),
        }
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = ConsensusConfig::default();
        assert_eq!(config.rounds, 5);
        assert_eq!(config.round_duration, Duration::from_secs(5));
        assert_eq!(config.grace_window, Duration::from_secs(5));
        assert_eq!(config.minimum_validators, 2);
    }

    #[test]
    fn final_round_is_rounds_plus_one() {
        let config = ConsensusConfig::default();
        assert_eq!(config.final_round(), 6);
    }

    #[test]
    fn driver_wait_matches_formula() {
        let config = ConsensusConfig::default();
        assert_eq!(config.driver_wait(), Duration::from_secs(6 * 5 + 5));
    }
}
