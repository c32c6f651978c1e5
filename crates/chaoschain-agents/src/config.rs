//! Deliberation timing as seen by one validator.
//!
//! Kept deliberately small and separate from
//! `chaoschain-consensus::config::ConsensusConfig`: agents never depend on
//! the consensus crate (spec.md Section 9's cycle-breaking discipline
//! generalized to crate boundaries), so the node wiring constructs both
//! from the same source of truth.

use std::time::Duration;

/// Round count and per-round sleep a validator uses while deliberating.
///
/// Reference: spec.md Section 6 — `R` (discussion rounds, default 5,
/// minimum 1) and `RoundDuration` (default 5s, minimum 1s).
#[derive(Debug, Clone, Copy)]
pub struct RoundTiming {
    pub rounds: u32,
    pub round_duration: Duration,
}

impl Default for RoundTiming {
    fn default() -> Self {
        Self {
            rounds: 5,
            round_duration: Duration::from_secs(5),
        }
    }
}

impl RoundTiming {
    #[must_use]
    pub fn new(rounds: u32, round_duration: Duration) -> Self {
        Self {
            rounds: rounds.max(1),
            round_duration,
        }
    }

    /// The round index used for the final vote (`R + 1`).
    #[must_use]
    pub fn final_round(&self) -> u32 {
        self.rounds + 1
    }
}
