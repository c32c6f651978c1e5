//! The per-chain Consensus Manager: the deliberation driver.
//!
//! Reference: spec.md Section 4.6. Grounded on
//! `qc-08-consensus::service::ConsensusService`'s method layout (private
//! `validate_*`/`apply_*` helpers returning a domain `Result`, called in
//! sequence from one public driver method), adapted from its PBFT/PoS
//! threshold logic to this core's bounded-round deliberation + majority
//! tally.

use crate::config::ConsensusConfig;
use crate::domain::deliberation::{Deliberation, DeliberationState};
use crate::domain::errors::ConsensusError;
use crate::domain::tally::tally_votes;
use chaoschain_bus::{DeliberationEvent, EventFilter, EventPublisher, EventTopic, InMemoryEventBus};
use chaoschain_ledger::{ChainRegistry, LedgerError};
use chaoschain_mempool::MempoolRegistry;
use chaoschain_telemetry::metrics::{
    DELIBERATIONS_ACCEPTED, DELIBERATIONS_REJECTED, DELIBERATIONS_STARTED,
    TRANSCRIPT_PERSIST_FAILURES, VOTES_TALLIED,
};
use chaoschain_transcripts::{BlobReference, BlobStore, MasterIndexStore, OffchainData, Outcome};
use chaoschain_types::{hash_to_hex, Block, ChainId, Hash};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::oneshot;
use tracing::{error, info, warn};

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Smallest backoff between retried `BlobStore::put` attempts.
const BLOB_STORE_RETRY_BACKOFF_MIN: Duration = Duration::from_millis(100);
/// Largest backoff between retried `BlobStore::put` attempts.
const BLOB_STORE_RETRY_BACKOFF_MAX: Duration = Duration::from_secs(5);

/// Retries `BlobStore::put` with a per-attempt deadline of
/// `request_timeout`, backing off between attempts, until either an attempt
/// succeeds or `max_wait` has elapsed since the first attempt (spec.md
/// Section 5, "BlobStore status polling loop has its own outer deadline
/// (MaxWaitTime ...); on timeout the transcript is considered lost").
async fn put_with_retry(
    blob_store: &dyn BlobStore,
    bytes: &[u8],
    request_timeout: Duration,
    max_wait: Duration,
) -> Result<String, String> {
    let started = Instant::now();
    let mut backoff = BLOB_STORE_RETRY_BACKOFF_MIN;

    loop {
        match tokio::time::timeout(request_timeout, blob_store.put(bytes)).await {
            Ok(Ok(blob_id)) => return Ok(blob_id),
            Ok(Err(e)) => {
                if started.elapsed() >= max_wait {
                    return Err(e.to_string());
                }
                warn!(error = %e, "blob store put failed, retrying within max wait window");
            }
            Err(_) => {
                if started.elapsed() >= max_wait {
                    return Err("blob store put timed out".to_string());
                }
                warn!("blob store put timed out, retrying within max wait window");
            }
        }

        let remaining = max_wait.saturating_sub(started.elapsed());
        if remaining.is_zero() {
            return Err("blob store max wait exceeded".to_string());
        }
        tokio::time::sleep(backoff.min(remaining)).await;
        backoff = (backoff * 2).min(BLOB_STORE_RETRY_BACKOFF_MAX);
    }
}

/// The final outcome of one deliberation, delivered to `Propose(wait=true)`
/// callers and `SubscribeResult` subscribers (spec.md Section 6).
#[derive(Debug, Clone)]
pub struct Verdict {
    pub chain_id: ChainId,
    pub block_hash: Hash,
    pub height: u64,
    pub accepted: bool,
    pub support: usize,
    pub oppose: usize,
    pub reason: String,
}

/// One instance per chain (lazy-created via [`crate::registry::ConsensusManagerRegistry`]).
/// Drives at most one deliberation at a time for its chain.
pub struct ConsensusManager {
    chain_id: ChainId,
    config: ConsensusConfig,
    bus: Arc<InMemoryEventBus>,
    chains: Arc<ChainRegistry>,
    mempools: Arc<MempoolRegistry>,
    blob_store: Arc<dyn BlobStore>,
    master_index: Arc<MasterIndexStore>,
    active: Mutex<Option<Arc<Deliberation>>>,
    subscribers: Mutex<HashMap<u64, Vec<oneshot::Sender<Verdict>>>>,
}

impl ConsensusManager {
    /// Constructs a manager for `chain_id` and spawns its transcript-append
    /// listener (subscribes to `BLOCK_DISCUSSION_TRIGGER` echoes and
    /// `AGENT_VOTE.*` for this chain and folds them into whichever
    /// deliberation is currently active).
    #[must_use]
    pub fn new(
        chain_id: ChainId,
        config: ConsensusConfig,
        bus: Arc<InMemoryEventBus>,
        chains: Arc<ChainRegistry>,
        mempools: Arc<MempoolRegistry>,
        blob_store: Arc<dyn BlobStore>,
        master_index: Arc<MasterIndexStore>,
    ) -> Arc<Self> {
        let manager = Arc::new(Self {
            chain_id,
            config,
            bus,
            chains,
            mempools,
            blob_store,
            master_index,
            active: Mutex::new(None),
            subscribers: Mutex::new(HashMap::new()),
        });
        manager.spawn_transcript_listener();
        manager
    }

    #[must_use]
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    #[must_use]
    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    /// `true` if a non-terminal deliberation is currently in flight.
    #[must_use]
    pub fn has_active_deliberation(&self) -> bool {
        self.active
            .lock()
            .as_ref()
            .is_some_and(|d| !d.state().is_terminal())
    }

    /// `Propose(block)` (spec.md Section 4.6). Rejects a block for another
    /// chain or a chain already mid-deliberation, otherwise starts one and
    /// returns the proposed block's hash (the external `threadId`).
    pub fn propose(self: &Arc<Self>, block: Block) -> Result<Hash, ConsensusError> {
        if block.chain_id != self.chain_id {
            return Err(ConsensusError::WrongChain {
                block_chain: block.chain_id,
                manager_chain: self.chain_id.clone(),
            });
        }

        {
            let mut active = self.active.lock();
            if active.as_ref().is_some_and(|d| !d.state().is_terminal()) {
                return Err(ConsensusError::InProgress);
            }

            let deliberation = Arc::new(Deliberation::new(
                block.clone(),
                self.config.final_round(),
                self.config.round_duration.as_secs(),
                now_unix(),
            ));
            *active = Some(deliberation);
        }

        let block_hash = block.hash();
        let manager = Arc::clone(self);
        tokio::spawn(async move { manager.drive().await });
        Ok(block_hash)
    }

    /// Registers a one-shot notification for the verdict at `height`. The
    /// channel is closed (dropped) after delivery.
    pub fn subscribe_result(&self, height: u64, sender: oneshot::Sender<Verdict>) {
        self.subscribers.lock().entry(height).or_default().push(sender);
    }

    fn current_deliberation(&self) -> Option<Arc<Deliberation>> {
        self.active.lock().clone()
    }

    fn spawn_transcript_listener(self: &Arc<Self>) {
        let manager = Arc::clone(self);
        let mut subscription = manager.bus.subscribe(EventFilter {
            topics: vec![EventTopic::BlockDiscussionTrigger, EventTopic::AgentVote],
            chain_id: Some(manager.chain_id.clone()),
        });

        tokio::spawn(async move {
            while let Some(event) = subscription.recv().await {
                manager.handle_transcript_event(event);
            }
        });
    }

    fn handle_transcript_event(&self, event: DeliberationEvent) {
        let (block_hash, discussion) = match event {
            DeliberationEvent::DiscussionPosted { block_hash, discussion, .. } => {
                (block_hash, discussion)
            }
            DeliberationEvent::AgentVote { block_hash, discussion, .. } => (block_hash, discussion),
            _ => return,
        };

        let Some(deliberation) = self.current_deliberation() else {
            return;
        };
        if deliberation.block().hash() != block_hash {
            return;
        }

        if let Some(mempool) = self.mempools.get(&self.chain_id) {
            let mut pool = mempool.lock();
            pool.set_ephemeral_identity(discussion.validator_id.clone(), discussion.validator_name.clone());
            if discussion.round == deliberation.final_round() {
                pool.append_ephemeral_vote(discussion.clone());
            }
        }

        deliberation.append_discussion(discussion);
    }

    /// The driver coroutine: spec.md Section 4.6, Steps 1-9.
    async fn drive(self: Arc<Self>) {
        let Some(deliberation) = self.current_deliberation() else {
            return;
        };

        // Step 1.
        deliberation.set_state(DeliberationState::InDiscussion);
        DELIBERATIONS_STARTED.with_label_values(&[&self.chain_id]).inc();

        let block = deliberation.block().clone();
        let block_hash = block.hash();

        // Step 2.
        self.bus
            .publish(DeliberationEvent::BlockDiscussionTrigger {
                chain_id: self.chain_id.clone(),
                block: block.clone(),
            })
            .await;

        // Step 3. The only synchronization point with validators.
        tokio::time::sleep(self.config.driver_wait()).await;

        // Step 4.
        deliberation.set_state(DeliberationState::Finalizing);
        let final_votes = deliberation.final_votes();
        VOTES_TALLIED.inc_by(final_votes.len() as u64);
        let tally = tally_votes(&final_votes);
        let reason = tally.reason(self.config.minimum_validators);

        // Step 5.
        let mut accepted = tally.accepted(self.config.minimum_validators);

        // Step 6.
        if accepted {
            if let Err(e) = self.apply_accept(&block) {
                error!(chain_id = %self.chain_id, error = %e, "accepted block failed linkage on append, downgrading to reject");
                self.bus
                    .publish(DeliberationEvent::CriticalError {
                        component: "consensus-manager".to_string(),
                        error: format!("invalid block linkage: {e}"),
                    })
                    .await;
                accepted = false;
            }
        }
        if !accepted {
            self.return_txs_to_mempool(&block);
        }

        deliberation.set_state(if accepted {
            DeliberationState::Accepted
        } else {
            DeliberationState::Rejected
        });

        if accepted {
            DELIBERATIONS_ACCEPTED.with_label_values(&[&self.chain_id]).inc();
        } else {
            DELIBERATIONS_REJECTED.with_label_values(&[&self.chain_id]).inc();
        }

        // Step 7.
        self.persist_transcript(&deliberation, &final_votes, accepted).await;

        // Step 8.
        let verdict = Verdict {
            chain_id: self.chain_id.clone(),
            block_hash,
            height: block.height,
            accepted,
            support: tally.support,
            oppose: tally.oppose,
            reason,
        };
        self.bus
            .publish(DeliberationEvent::Verdict {
                chain_id: verdict.chain_id.clone(),
                block_hash: verdict.block_hash,
                height: verdict.height,
                accepted: verdict.accepted,
                support: verdict.support,
                oppose: verdict.oppose,
                reason: verdict.reason.clone(),
            })
            .await;
        self.notify_subscribers(verdict);

        // Step 9.
        if let Some(mempool) = self.mempools.get(&self.chain_id) {
            mempool.lock().clear_ephemeral_data();
        }
        *self.active.lock() = None;
    }

    fn apply_accept(&self, block: &Block) -> Result<(), LedgerError> {
        let chain_handle = self.chains.get_chain(&self.chain_id)?;
        let mempool = self.mempools.get_or_create(&self.chain_id);
        let mut pool = mempool.lock();
        let mut chain_state = chain_handle.state().write();
        chain_state.append_block(block.clone(), &mut pool)
    }

    fn return_txs_to_mempool(&self, block: &Block) {
        let mempool = self.mempools.get_or_create(&self.chain_id);
        let mut pool = mempool.lock();
        for tx in &block.txs {
            pool.readd(tx.clone());
        }
    }

    async fn persist_transcript(&self, deliberation: &Deliberation, votes: &[chaoschain_types::Discussion], accepted: bool) {
        let block = deliberation.block();
        let block_hash = block.hash();
        let timestamp = now_unix();

        let mut agent_identities = HashMap::new();
        for discussion in deliberation.discussions() {
            agent_identities
                .entry(discussion.validator_id.clone())
                .or_insert(discussion.validator_name.clone());
        }

        let offchain = OffchainData {
            chain_id: self.chain_id.clone(),
            block_hash,
            block_height: block.height,
            discussions: deliberation.discussions(),
            votes: votes.to_vec(),
            outcome: if accepted { Outcome::Accepted } else { Outcome::Rejected },
            agent_identities,
            timestamp,
        };

        let bytes = match serde_json::to_vec(&offchain) {
            Ok(bytes) => bytes,
            Err(e) => {
                TRANSCRIPT_PERSIST_FAILURES.inc();
                self.surface_persist_failure(block_hash, format!("serialize transcript: {e}")).await;
                return;
            }
        };

        let blob_id = match put_with_retry(
            self.blob_store.as_ref(),
            &bytes,
            self.config.blob_store_request_timeout,
            self.config.blob_store_max_wait,
        )
        .await
        {
            Ok(id) => id,
            Err(reason) => {
                TRANSCRIPT_PERSIST_FAILURES.inc();
                self.surface_persist_failure(block_hash, reason).await;
                return;
            }
        };

        self.bus
            .publish(DeliberationEvent::DataStored { blob_id: blob_id.clone(), timestamp })
            .await;

        let reference = BlobReference {
            blob_id,
            chain_id: self.chain_id.clone(),
            block_hash: hash_to_hex(&block_hash),
            block_height: block.height,
            timestamp,
            outcome: offchain.outcome.as_str().to_string(),
        };

        if let Err(e) = self.master_index.record_transcript(reference).await {
            TRANSCRIPT_PERSIST_FAILURES.inc();
            self.surface_persist_failure(block_hash, e.to_string()).await;
        } else {
            info!(chain_id = %self.chain_id, height = block.height, "transcript persisted and indexed");
        }
    }

    async fn surface_persist_failure(&self, block_hash: Hash, reason: String) {
        warn!(chain_id = %self.chain_id, reason = %reason, "transcript persist failed");
        self.bus
            .publish(DeliberationEvent::TranscriptPersistFailed {
                chain_id: self.chain_id.clone(),
                block_hash,
                reason,
            })
            .await;
    }

    fn notify_subscribers(&self, verdict: Verdict) {
        let senders = self.subscribers.lock().remove(&verdict.height).unwrap_or_default();
        for sender in senders {
            let _ = sender.send(verdict.clone());
        }
    }
}
