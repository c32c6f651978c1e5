//! The in-flight state machine for one proposed block.
//!
//! Reference: spec.md Section 3, **Deliberation (`BlockConsensus`)**. Created
//! by `ConsensusManager::Propose`, mutated only by the manager's driver task
//! and by append-only transcript writes guarded by this type's own lock
//! (spec.md Section 5 — `Deliberation`'s append path takes its own lock
//! rather than the manager's top-level one, matching the split-lock
//! discipline of `qc-08-consensus::service::ConsensusService`).

use chaoschain_types::{Block, Discussion, ValidatorId};
use parking_lot::Mutex;
use std::collections::HashSet;

/// Lifecycle state of one deliberation.
///
/// Reference: spec.md Section 3 — `State ∈ {Pending, InDiscussion,
/// Finalizing, Accepted, Rejected}`; terminal once `Accepted` or `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliberationState {
    Pending,
    InDiscussion,
    Finalizing,
    Accepted,
    Rejected,
}

impl DeliberationState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

/// One end-to-end run of rounds plus tally for a single proposed block.
pub struct Deliberation {
    block: Block,
    final_round: u32,
    state: Mutex<DeliberationState>,
    discussions: Mutex<Vec<Discussion>>,
    /// Precomputed wall-clock deadline (unix seconds) for each round
    /// `1..=final_round`, i.e. `start_time + k * round_duration`. Supplemental
    /// field (SPEC_FULL.md Section 3, `Deliberation.RoundDeadlines`): lets a
    /// late utterance be classified "late" without being dropped, since
    /// round boundaries are soft (spec.md Section 4.5 step 2e).
    round_deadlines: Vec<u64>,
    start_time: u64,
}

impl Deliberation {
    #[must_use]
    pub fn new(block: Block, final_round: u32, round_duration_secs: u64, start_time: u64) -> Self {
        let round_deadlines = (1..=final_round)
            .map(|k| start_time + k as u64 * round_duration_secs)
            .collect();
        Self {
            block,
            final_round,
            state: Mutex::new(DeliberationState::Pending),
            discussions: Mutex::new(Vec::new()),
            round_deadlines,
            start_time,
        }
    }

    #[must_use]
    pub fn block(&self) -> &Block {
        &self.block
    }

    #[must_use]
    pub fn final_round(&self) -> u32 {
        self.final_round
    }

    #[must_use]
    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    #[must_use]
    pub fn round_deadlines(&self) -> &[u64] {
        &self.round_deadlines
    }

    #[must_use]
    pub fn state(&self) -> DeliberationState {
        *self.state.lock()
    }

    pub fn set_state(&self, state: DeliberationState) {
        *self.state.lock() = state;
    }

    /// Appends an utterance to the transcript if it is round-bounded and, for
    /// the final-vote round only, not a repeat from the same validator.
    /// Earlier rounds are best-effort (spec.md Section 3, Discussion
    /// invariant): a second utterance from the same validator in a
    /// discussion round is still appended, the tally simply counts at most
    /// one of them later (spec.md Section 4.6, Step 4).
    ///
    /// Returns `true` if the utterance was appended.
    pub fn append_discussion(&self, discussion: Discussion) -> bool {
        if discussion.round == 0 || discussion.round > self.final_round {
            return false;
        }

        let mut discussions = self.discussions.lock();
        if discussion.round == self.final_round {
            let already_voted = discussions
                .iter()
                .any(|d| d.round == self.final_round && d.validator_id == discussion.validator_id);
            if already_voted {
                return false;
            }
        }
        discussions.push(discussion);
        true
    }

    /// Snapshot of the transcript so far, in append order.
    #[must_use]
    pub fn discussions(&self) -> Vec<Discussion> {
        self.discussions.lock().clone()
    }

    /// Final-round utterances only, deduplicated by validator: first
    /// observed wins, ties broken by timestamp ascending then id ascending
    /// (spec.md Section 4.6, Step 4).
    #[must_use]
    pub fn final_votes(&self) -> Vec<Discussion> {
        let discussions = self.discussions.lock();
        let mut final_round: Vec<Discussion> = discussions
            .iter()
            .filter(|d| d.round == self.final_round)
            .cloned()
            .collect();
        final_round.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));

        let mut seen: HashSet<ValidatorId> = HashSet::new();
        let mut counted = Vec::new();
        for discussion in final_round {
            if seen.insert(discussion.validator_id.clone()) {
                counted.push(discussion);
            }
        }
        counted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaoschain_types::DiscussionType;

    fn discussion(validator: &str, round: u32, ts: u64, id: &str) -> Discussion {
        Discussion {
            id: id.to_string(),
            validator_id: validator.to_string(),
            validator_name: validator.to_string(),
            message: "msg".to_string(),
            discussion_type: DiscussionType::Support,
            round,
            timestamp: ts,
        }
    }

    fn sample_block() -> Block {
        Block::genesis("c1".to_string(), 0)
    }

    #[test]
    fn round_outside_bound_is_rejected() {
        let d = Deliberation::new(sample_block(), 6, 5, 0);
        assert!(!d.append_discussion(discussion("v1", 0, 1, "a")));
        assert!(!d.append_discussion(discussion("v1", 7, 1, "b")));
        assert!(d.discussions().is_empty());
    }

    #[test]
    fn final_round_rejects_second_utterance_from_same_validator() {
        let d = Deliberation::new(sample_block(), 6, 5, 0);
        assert!(d.append_discussion(discussion("v1", 6, 1, "a")));
        assert!(!d.append_discussion(discussion("v1", 6, 2, "b")));
        assert_eq!(d.discussions().len(), 1);
    }

    #[test]
    fn earlier_round_accepts_repeats_best_effort() {
        let d = Deliberation::new(sample_block(), 6, 5, 0);
        assert!(d.append_discussion(discussion("v1", 1, 1, "a")));
        assert!(d.append_discussion(discussion("v1", 1, 2, "b")));
        assert_eq!(d.discussions().len(), 2);
    }

    #[test]
    fn final_votes_dedups_keeping_first_by_timestamp_then_id() {
        let d = Deliberation::new(sample_block(), 2, 5, 0);
        // Bypass append's own-dedup by inserting both directly via separate
        // deliberations is not possible; exercise the tie-break via
        // final_votes() directly using distinct validators plus one
        // legitimate single vote per validator.
        d.append_discussion(discussion("v1", 2, 10, "z"));
        d.append_discussion(discussion("v2", 2, 5, "a"));
        let votes = d.final_votes();
        assert_eq!(votes.len(), 2);
        assert_eq!(votes[0].validator_id, "v2");
        assert_eq!(votes[1].validator_id, "v1");
    }

    #[test]
    fn round_deadlines_are_evenly_spaced_from_start() {
        let d = Deliberation::new(sample_block(), 3, 5, 100);
        assert_eq!(d.round_deadlines(), &[105, 110, 115]);
    }
}
