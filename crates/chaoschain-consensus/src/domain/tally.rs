//! Vote tallying and the acceptance decision rule.
//!
//! Reference: spec.md Section 4.6, Steps 4-5 and Section 8, "Decision rule":
//! `Accept ⇔ total ≥ MinimumValidators ∧ support > total/2`.

use chaoschain_types::{Discussion, DiscussionType};

/// The outcome of tallying one deliberation's final-round votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub support: usize,
    pub oppose: usize,
}

impl Tally {
    #[must_use]
    pub fn total(&self) -> usize {
        self.support + self.oppose
    }

    /// `Accept ⇔ total ≥ minimum_validators ∧ support > total/2`.
    #[must_use]
    pub fn accepted(&self, minimum_validators: usize) -> bool {
        let total = self.total();
        total >= minimum_validators && self.support * 2 > total
    }

    /// A short human-readable reason for the decision, used in the
    /// `Verdict` event and the transcript.
    #[must_use]
    pub fn reason(&self, minimum_validators: usize) -> String {
        let total = self.total();
        if total < minimum_validators {
            format!(
                "quorum not reached: {total} counted votes, need at least {minimum_validators}"
            )
        } else if self.accepted(minimum_validators) {
            format!("accepted: {} support vs {} oppose", self.support, self.oppose)
        } else {
            format!("rejected: {} support vs {} oppose, not a majority", self.support, self.oppose)
        }
    }
}

/// Tallies `final_votes` (already deduplicated to at most one per
/// validator, spec.md Section 4.6 Step 4) into support/oppose counts.
/// Votes that parsed to neither `support` nor `oppose` are structurally
/// impossible here since the agent's final-vote parser only ever emits
/// those two, but any other type is ignored defensively rather than
/// panicking.
#[must_use]
pub fn tally_votes(final_votes: &[Discussion]) -> Tally {
    let mut support = 0;
    let mut oppose = 0;
    for vote in final_votes {
        match vote.discussion_type {
            DiscussionType::Support => support += 1,
            DiscussionType::Oppose => oppose += 1,
            DiscussionType::Question | DiscussionType::Comment => {}
        }
    }
    Tally { support, oppose }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(kind: DiscussionType) -> Discussion {
        Discussion {
            id: "d".into(),
            validator_id: "v".into(),
            validator_name: "v".into(),
            message: String::new(),
            discussion_type: kind,
            round: 6,
            timestamp: 0,
        }
    }

    #[test]
    fn three_support_is_accepted() {
        let votes = vec![vote(DiscussionType::Support); 3];
        let tally = tally_votes(&votes);
        assert_eq!(tally, Tally { support: 3, oppose: 0 });
        assert!(tally.accepted(2));
    }

    #[test]
    fn tied_vote_is_not_accepted() {
        let votes = vec![vote(DiscussionType::Support), vote(DiscussionType::Oppose)];
        let tally = tally_votes(&votes);
        assert_eq!(tally.total(), 2);
        assert!(!tally.accepted(2));
    }

    #[test]
    fn below_quorum_is_not_accepted_even_if_unanimous() {
        let votes = vec![vote(DiscussionType::Support)];
        let tally = tally_votes(&votes);
        assert!(!tally.accepted(2));
    }

    #[test]
    fn question_and_comment_types_are_not_counted() {
        let votes = vec![vote(DiscussionType::Question), vote(DiscussionType::Comment)];
        let tally = tally_votes(&votes);
        assert_eq!(tally.total(), 0);
    }
}
