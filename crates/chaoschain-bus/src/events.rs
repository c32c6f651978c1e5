//! # Deliberation Events
//!
//! Defines every event that flows through the shared bus during a
//! deliberation. Payloads mirror the subjects table in spec.md Section 6.

use chaoschain_types::{Block, ChainId, Discussion, Hash, Transaction};
use serde::{Deserialize, Serialize};

/// All events that can be published to the bus.
///
/// Reference: spec.md Section 6, pub/sub subjects table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeliberationEvent {
    /// `BLOCK_DISCUSSION_TRIGGER` (manager -> validators): a block has been
    /// proposed and deliberation should begin.
    BlockDiscussionTrigger { chain_id: ChainId, block: Block },

    /// `BLOCK_DISCUSSION_TRIGGER` observer echo (validators -> observers):
    /// one validator's utterance, republished for UIs after being appended
    /// to the transcript.
    DiscussionPosted {
        chain_id: ChainId,
        block_hash: Hash,
        discussion: Discussion,
    },

    /// `AGENT_VOTE.<blockHash>` (validators -> manager, observers): a
    /// validator's final-round utterance.
    AgentVote {
        chain_id: ChainId,
        block_hash: Hash,
        discussion: Discussion,
    },

    /// Final outcome of one deliberation.
    Verdict {
        chain_id: ChainId,
        block_hash: Hash,
        height: u64,
        accepted: bool,
        support: usize,
        oppose: usize,
        reason: String,
    },

    /// `data.stored` (BlobStore -> observers).
    DataStored {
        blob_id: String,
        timestamp: u64,
    },

    /// `data.retrieved` (BlobStore -> observers).
    DataRetrieved {
        blob_id: String,
        timestamp: u64,
    },

    /// Advisory: a validator logged a bribe offer or other influence
    /// attempt. Never consulted by the tally (spec.md Section 9, Open
    /// Questions: relationships are advisory).
    ValidatorInfluence {
        chain_id: ChainId,
        validator_id: String,
        from: String,
        amount: u64,
        memo: String,
    },

    /// Best-effort failure surfaced on the observer stream; never undoes a
    /// chain decision (spec.md Section 7).
    TranscriptPersistFailed {
        chain_id: ChainId,
        block_hash: Hash,
        reason: String,
    },

    /// Critical error requiring operator attention.
    CriticalError { component: String, error: String },

    /// `TRANSACTION` (chain -> observers): a transaction was accepted into
    /// the mempool via `ProposeTransaction`.
    TransactionSubmitted { chain_id: ChainId, tx: Transaction },
}

impl DeliberationEvent {
    /// Get the topic for this event (used for subscription filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::BlockDiscussionTrigger { .. } => EventTopic::BlockDiscussionTrigger,
            Self::DiscussionPosted { .. } => EventTopic::BlockDiscussionTrigger,
            Self::AgentVote { .. } => EventTopic::AgentVote,
            Self::Verdict { .. } => EventTopic::Verdict,
            Self::DataStored { .. } => EventTopic::DataStored,
            Self::DataRetrieved { .. } => EventTopic::DataRetrieved,
            Self::ValidatorInfluence { .. } => EventTopic::ValidatorInfluence,
            Self::TranscriptPersistFailed { .. } => EventTopic::DeadLetterQueue,
            Self::CriticalError { .. } => EventTopic::DeadLetterQueue,
            Self::TransactionSubmitted { .. } => EventTopic::Transaction,
        }
    }

    /// Render the literal dotted subject string used in spec.md Section 6
    /// (`AGENT_VOTE.<blockHash>` etc). Purely descriptive here: routing is
    /// done by `EventTopic`/`EventFilter`, not string matching, the same way
    /// the teacher's bus documents NATS-style subjects but dispatches on an
    /// internal topic enum.
    #[must_use]
    pub fn subject(&self) -> String {
        match self {
            Self::BlockDiscussionTrigger { .. } | Self::DiscussionPosted { .. } => {
                "BLOCK_DISCUSSION_TRIGGER".to_string()
            }
            Self::AgentVote { block_hash, .. } => {
                format!("AGENT_VOTE.{}", chaoschain_types::hash_to_hex(block_hash))
            }
            Self::Verdict { .. } => "VERDICT".to_string(),
            Self::DataStored { .. } => "data.stored".to_string(),
            Self::DataRetrieved { .. } => "data.retrieved".to_string(),
            Self::ValidatorInfluence { .. } => "VALIDATOR_INFLUENCE".to_string(),
            Self::TranscriptPersistFailed { .. } | Self::CriticalError { .. } => {
                "dlq.critical".to_string()
            }
            Self::TransactionSubmitted { .. } => "TRANSACTION".to_string(),
        }
    }

    /// `chain_id` this event concerns, if any (bus-level events like
    /// `data.stored` are chain-agnostic).
    #[must_use]
    pub fn chain_id(&self) -> Option<&str> {
        match self {
            Self::BlockDiscussionTrigger { chain_id, .. }
            | Self::DiscussionPosted { chain_id, .. }
            | Self::AgentVote { chain_id, .. }
            | Self::Verdict { chain_id, .. }
            | Self::ValidatorInfluence { chain_id, .. }
            | Self::TranscriptPersistFailed { chain_id, .. }
            | Self::TransactionSubmitted { chain_id, .. } => Some(chain_id),
            Self::DataStored { .. } | Self::DataRetrieved { .. } | Self::CriticalError { .. } => {
                None
            }
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    BlockDiscussionTrigger,
    AgentVote,
    Verdict,
    DataStored,
    DataRetrieved,
    ValidatorInfluence,
    DeadLetterQueue,
    Transaction,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Restrict to a single chain. `None` means all chains.
    pub chain_id: Option<ChainId>,
}

impl EventFilter {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            chain_id: None,
        }
    }

    #[must_use]
    pub fn for_chain(chain_id: impl Into<ChainId>) -> Self {
        Self {
            topics: Vec::new(),
            chain_id: Some(chain_id.into()),
        }
    }

    #[must_use]
    pub fn matches(&self, event: &DeliberationEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let chain_match = match (&self.chain_id, event.chain_id()) {
            (Some(want), Some(got)) => want == got,
            (Some(_), None) => false,
            (None, _) => true,
        };

        topic_match && chain_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> Block {
        Block::genesis("c1".to_string(), 0)
    }

    #[test]
    fn trigger_topic_and_subject() {
        let e = DeliberationEvent::BlockDiscussionTrigger {
            chain_id: "c1".to_string(),
            block: sample_block(),
        };
        assert_eq!(e.topic(), EventTopic::BlockDiscussionTrigger);
        assert_eq!(e.subject(), "BLOCK_DISCUSSION_TRIGGER");
    }

    #[test]
    fn filter_by_chain() {
        let filter = EventFilter::for_chain("c1");
        let matching = DeliberationEvent::BlockDiscussionTrigger {
            chain_id: "c1".to_string(),
            block: sample_block(),
        };
        let other = DeliberationEvent::BlockDiscussionTrigger {
            chain_id: "c2".to_string(),
            block: sample_block(),
        };
        assert!(filter.matches(&matching));
        assert!(!filter.matches(&other));
    }

    #[test]
    fn filter_by_topic() {
        let filter = EventFilter::topics(vec![EventTopic::Verdict]);
        let verdict = DeliberationEvent::Verdict {
            chain_id: "c1".to_string(),
            block_hash: [0u8; 32],
            height: 1,
            accepted: true,
            support: 3,
            oppose: 0,
            reason: "quorum reached".into(),
        };
        let trigger = DeliberationEvent::BlockDiscussionTrigger {
            chain_id: "c1".to_string(),
            block: sample_block(),
        };
        assert!(filter.matches(&verdict));
        assert!(!filter.matches(&trigger));
    }
}
