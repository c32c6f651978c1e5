//! The validator agent's lifecycle and round loop.
//!
//! Reference: spec.md Section 4.5. Grounded on the task-per-trigger pattern
//! of `qc-17-block-production::service::ConcreteBlockProducer` (one
//! `tokio::task` per inbound event, config-bounded loop) and the
//! typed-registry-entity shape of `qc-08-consensus::domain::validator`.

use crate::config::RoundTiming;
use crate::domain::identity::ValidatorProfile;
use crate::domain::state::{BribeOffer, ValidatorState};
use crate::parsing::{parse_final_vote, parse_round_response};
use crate::prompt::{build_final_vote_prompt, build_round_prompt};
use chaoschain_bus::{DeliberationEvent, EventFilter, EventPublisher, EventTopic, InMemoryEventBus};
use chaoschain_oracle::Oracle;
use chaoschain_types::{Block, ChainId, Discussion, Hash, ValidatorId};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// A registered validator: fixed identity, mutable flavor state, and the
/// collaborators it needs to deliberate (oracle, bus).
///
/// Subscribes to `BLOCK_DISCUSSION_TRIGGER` on the chain it is registered
/// for; runs at most one deliberation coroutine per block (spec.md Section
/// 4.5, "Concurrency").
pub struct ValidatorHandle {
    profile: ValidatorProfile,
    state: Mutex<ValidatorState>,
    oracle: Arc<dyn Oracle>,
    bus: Arc<InMemoryEventBus>,
    chain_id: ChainId,
    timing: RoundTiming,
    handled_blocks: Mutex<HashSet<Hash>>,
}

impl ValidatorHandle {
    #[must_use]
    pub fn new(
        profile: ValidatorProfile,
        chain_id: ChainId,
        oracle: Arc<dyn Oracle>,
        bus: Arc<InMemoryEventBus>,
        timing: RoundTiming,
    ) -> Arc<Self> {
        Arc::new(Self {
            profile,
            state: Mutex::new(ValidatorState::default()),
            oracle,
            bus,
            chain_id,
            timing,
            handled_blocks: Mutex::new(HashSet::new()),
        })
    }

    #[must_use]
    pub fn id(&self) -> &ValidatorId {
        &self.profile.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn set_mood(&self, mood: impl Into<String>) {
        self.state.lock().set_mood(mood);
    }

    #[must_use]
    pub fn mood(&self) -> String {
        self.state.lock().mood.clone()
    }

    /// Advisory relationship edit, per spec.md Section 4.5 — never
    /// consulted by the tally.
    pub fn set_relationship(&self, other: ValidatorId, score: f64) {
        self.state.lock().set_relationship(other, score);
    }

    #[must_use]
    pub fn relationship_with(&self, other: &str) -> f64 {
        self.state.lock().relationship_with(other)
    }

    /// Logs an influence attempt and publishes it on the observer stream.
    /// Advisory only (spec.md Section 9, Open Questions).
    pub async fn log_bribe(&self, from: impl Into<String>, amount: u64, memo: impl Into<String>) {
        let from = from.into();
        let memo = memo.into();
        self.state.lock().log_bribe(BribeOffer {
            from: from.clone(),
            amount,
            memo: memo.clone(),
        });
        self.bus
            .publish(DeliberationEvent::ValidatorInfluence {
                chain_id: self.chain_id.clone(),
                validator_id: self.profile.id.clone(),
                from,
                amount,
                memo,
            })
            .await;
    }

    /// Spawns a task that listens for `BLOCK_DISCUSSION_TRIGGER` events on
    /// this validator's chain and runs one deliberation per block.
    #[must_use]
    pub fn spawn_listener(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let handle = Arc::clone(self);
        let mut subscription = handle.bus.subscribe(EventFilter {
            topics: vec![EventTopic::BlockDiscussionTrigger],
            chain_id: Some(handle.chain_id.clone()),
        });

        tokio::spawn(async move {
            while let Some(event) = subscription.recv().await {
                if let DeliberationEvent::BlockDiscussionTrigger { block, .. } = event {
                    let worker = Arc::clone(&handle);
                    tokio::spawn(async move {
                        worker.run_deliberation(block).await;
                    });
                }
            }
        })
    }

    /// Runs the full round loop for one block: `R` discussion rounds plus
    /// the final-vote round (spec.md Section 4.5, steps 1-3).
    pub async fn run_deliberation(self: Arc<Self>, block: Block) {
        let block_hash = block.hash();

        {
            let mut handled = self.handled_blocks.lock();
            if handled.contains(&block_hash) {
                info!(
                    validator = %self.profile.name,
                    block_hash = %chaoschain_types::hash_to_hex(&block_hash),
                    "already deliberated on this block, skipping"
                );
                return;
            }
            handled.insert(block_hash);
        }

        let mut transcript: Vec<Discussion> = Vec::new();

        for round in 1..=self.timing.rounds {
            let prompt = build_round_prompt(&self.profile, &block, &transcript, round);
            let (stance, message) = match self.oracle.ask(&prompt).await {
                Ok(text) => parse_round_response(&text),
                Err(e) => {
                    warn!(validator = %self.profile.name, error = %e, "oracle call failed, defaulting to question");
                    (chaoschain_types::DiscussionType::Question, e.to_string())
                }
            };

            let discussion = Discussion {
                id: uuid::Uuid::new_v4().to_string(),
                validator_id: self.profile.id.clone(),
                validator_name: self.profile.name.clone(),
                message,
                discussion_type: stance,
                round,
                timestamp: now_unix(),
            };
            transcript.push(discussion.clone());

            self.bus
                .publish(DeliberationEvent::DiscussionPosted {
                    chain_id: self.chain_id.clone(),
                    block_hash,
                    discussion,
                })
                .await;

            tokio::time::sleep(self.timing.round_duration).await;
        }

        let final_prompt = build_final_vote_prompt(&self.profile, &block, &transcript);
        let (stance, message) = match self.oracle.ask(&final_prompt).await {
            Ok(text) => parse_final_vote(&text),
            Err(e) => {
                warn!(validator = %self.profile.name, error = %e, "oracle call failed on final vote, defaulting to oppose");
                (chaoschain_types::DiscussionType::Oppose, e.to_string())
            }
        };

        let final_vote = Discussion {
            id: uuid::Uuid::new_v4().to_string(),
            validator_id: self.profile.id.clone(),
            validator_name: self.profile.name.clone(),
            message,
            discussion_type: stance,
            round: self.timing.final_round(),
            timestamp: now_unix(),
        };

        self.bus
            .publish(DeliberationEvent::AgentVote {
                chain_id: self.chain_id.clone(),
                block_hash,
                discussion: final_vote,
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaoschain_oracle::ScriptedOracle;
    use std::time::Duration;

    fn profile(id: &str, name: &str) -> ValidatorProfile {
        ValidatorProfile::new(id, name, ["skeptical"], "terse", ["none"], "be good")
    }

    #[tokio::test(start_paused = true)]
    async fn emits_one_discussion_per_round_and_one_final_vote() {
        let bus = Arc::new(InMemoryEventBus::new());
        let mut observer = bus.subscribe(EventFilter::all());
        let oracle: Arc<dyn Oracle> = Arc::new(ScriptedOracle::repeating(
            r#"{"stance":"SUPPORT","reason":"ok"}"#,
        ));
        let timing = RoundTiming::new(2, Duration::from_millis(1));
        let validator = ValidatorHandle::new(profile("v1", "Ada"), "c1".into(), oracle, bus.clone(), timing);

        let block = Block::genesis("c1".to_string(), 0);
        validator.run_deliberation(block).await;

        let mut discussions = 0;
        let mut votes = 0;
        while let Ok(Some(event)) = observer.try_recv() {
            match event {
                DeliberationEvent::DiscussionPosted { .. } => discussions += 1,
                DeliberationEvent::AgentVote { .. } => votes += 1,
                _ => {}
            }
        }
        assert_eq!(discussions, 2);
        assert_eq!(votes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_trigger_for_same_block_is_skipped() {
        let bus = Arc::new(InMemoryEventBus::new());
        let oracle: Arc<dyn Oracle> = Arc::new(ScriptedOracle::repeating(
            r#"{"stance":"OPPOSE","reason":"no"}"#,
        ));
        let timing = RoundTiming::new(1, Duration::from_millis(1));
        let validator = ValidatorHandle::new(profile("v1", "Ada"), "c1".into(), oracle, bus, timing);

        let block = Block::genesis("c1".to_string(), 0);
        validator.clone().run_deliberation(block.clone()).await;
        validator.clone().run_deliberation(block).await;

        assert_eq!(validator.handled_blocks.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_oracle_response_defaults_question_then_oppose() {
        let bus = Arc::new(InMemoryEventBus::new());
        let mut observer = bus.subscribe(EventFilter::all());
        let oracle: Arc<dyn Oracle> = Arc::new(ScriptedOracle::garbage());
        let timing = RoundTiming::new(1, Duration::from_millis(1));
        let validator = ValidatorHandle::new(profile("v1", "Ada"), "c1".into(), oracle, bus, timing);

        validator
            .run_deliberation(Block::genesis("c1".to_string(), 0))
            .await;

        let mut saw_question = false;
        let mut saw_oppose_vote = false;
        while let Ok(Some(event)) = observer.try_recv() {
            match event {
                DeliberationEvent::DiscussionPosted { discussion, .. } => {
                    saw_question = discussion.discussion_type == chaoschain_types::DiscussionType::Question;
                }
                DeliberationEvent::AgentVote { discussion, .. } => {
                    saw_oppose_vote = discussion.discussion_type == chaoschain_types::DiscussionType::Oppose;
                }
                _ => {}
            }
        }
        assert!(saw_question);
        assert!(saw_oppose_vote);
    }
}
