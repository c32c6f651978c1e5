//! End-to-end deliberation scenarios, wired through `chaoschain-node`'s
//! `NodeContainer` rather than through any single crate's internals.
//!
//! Reference: spec.md Section 8, "End-to-end scenarios with literal inputs"
//! (scenarios 1-6).

use std::sync::Arc;
use std::time::Duration;

use chaoschain_agents::ValidatorProfile;
use chaoschain_consensus::ConsensusConfig;
use chaoschain_node::{NodeConfig, NodeContainer, ProposalIngress, ProposeOutcome};
use chaoschain_oracle::{Oracle, ScriptedOracle};
use chaoschain_transcripts::Outcome;
use chaoschain_types::{Block, Transaction, TransactionType};

async fn harness(rounds: u32, minimum_validators: usize, reward_pool: u64) -> (NodeContainer, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = NodeConfig::default();
    config.data_dir = dir.path().to_path_buf();
    config.consensus = ConsensusConfig {
        rounds,
        round_duration: Duration::from_millis(5),
        grace_window: Duration::from_millis(5),
        minimum_validators,
        mempool_expiry: Duration::from_secs(3600),
        blob_store_request_timeout: Duration::from_secs(5),
        blob_store_max_wait: Duration::from_secs(5),
    };
    let container = NodeContainer::new(config).await.unwrap();
    container.create_chain("c1", "be good", reward_pool, 0).unwrap();
    (container, dir)
}

fn register(container: &NodeContainer, id: &str, name: &str, response: &str) {
    let oracle: Arc<dyn Oracle> = Arc::new(ScriptedOracle::repeating(response));
    let profile = ValidatorProfile::new(id, name, ["skeptical"], "terse", ["none"], "be good");
    container.register_validator("c1", profile, oracle);
}

fn follow_on_block(container: &NodeContainer, txs: Vec<Transaction>) -> Block {
    let tail_hash = container.chains().get_chain("c1").unwrap().state().read().tail().hash_hex();
    Block {
        height: 1,
        prev_hash: tail_hash,
        txs,
        timestamp: 0,
        proposer: "proposer-1".to_string(),
        chain_id: "c1".to_string(),
        signature: String::new(),
    }
}

/// Scenario 1: three validators unanimously support; block is accepted,
/// chain grows, and a transcript is persisted and indexed.
#[tokio::test(start_paused = true)]
async fn happy_path_three_validators_accepts_and_persists_transcript() {
    let (container, _dir) = harness(5, 2, 1000).await;
    register(&container, "v1", "Ada", r#"{"stance":"SUPPORT","reason":"r"}"#);
    register(&container, "v2", "Grace", r#"{"stance":"SUPPORT","reason":"r"}"#);
    register(&container, "v3", "Linus", r#"{"stance":"SUPPORT","reason":"r"}"#);

    let ingress = ProposalIngress::new(container.clone());
    let budget = ingress.recommended_wait_budget();
    let outcome = ingress.propose(follow_on_block(&container, vec![]), Some(budget)).await.unwrap();

    let verdict = match outcome {
        ProposeOutcome::Decided(v) => v,
        other => panic!("expected decided verdict, got {other:?}"),
    };
    assert!(verdict.accepted);
    assert_eq!(verdict.support, 3);
    assert_eq!(verdict.oppose, 0);
    assert_eq!(container.chains().get_chain("c1").unwrap().state().read().height(), 2);

    // Transcript persisted and indexed exactly once, with the matching
    // outcome (spec.md Section 8, "Transcript round-trip").
    let block_hash_hex = chaoschain_types::hash_to_hex(&verdict.block_hash);
    let reference = container
        .master_index()
        .by_block_hash("c1", &block_hash_hex)
        .expect("transcript indexed");
    assert_eq!(reference.outcome, Outcome::Accepted.as_str());

    let stored = container.blob_store().get(&reference.blob_id).await.unwrap();
    let offchain: chaoschain_transcripts::OffchainData = serde_json::from_slice(&stored).unwrap();
    assert_eq!(offchain.chain_id, "c1");
    assert_eq!(offchain.outcome, Outcome::Accepted);
    assert_eq!(offchain.votes.len(), 3);
}

/// Scenario 2: one support, one oppose. `support/total == 0.5`, not `>
/// 0.5`, so the block is rejected.
#[tokio::test(start_paused = true)]
async fn tied_vote_is_rejected() {
    let (container, _dir) = harness(5, 2, 1000).await;
    register(&container, "v1", "Ada", r#"{"stance":"SUPPORT","reason":"r"}"#);
    register(&container, "v2", "Grace", r#"{"stance":"OPPOSE","reason":"no"}"#);

    let ingress = ProposalIngress::new(container.clone());
    let budget = ingress.recommended_wait_budget();
    let outcome = ingress.propose(follow_on_block(&container, vec![]), Some(budget)).await.unwrap();

    let verdict = match outcome {
        ProposeOutcome::Decided(v) => v,
        other => panic!("expected decided verdict, got {other:?}"),
    };
    assert!(!verdict.accepted);
    assert_eq!(verdict.support, 1);
    assert_eq!(verdict.oppose, 1);
    assert_eq!(container.chains().get_chain("c1").unwrap().state().read().height(), 1);
}

/// Scenario 3: only one validator votes. `total < MinimumValidators`, so
/// the block is rejected regardless of stance.
#[tokio::test(start_paused = true)]
async fn quorum_failure_rejects_with_single_validator() {
    let (container, _dir) = harness(5, 2, 1000).await;
    register(&container, "v1", "Ada", r#"{"stance":"SUPPORT","reason":"r"}"#);

    let ingress = ProposalIngress::new(container.clone());
    let budget = ingress.recommended_wait_budget();
    let outcome = ingress.propose(follow_on_block(&container, vec![]), Some(budget)).await.unwrap();

    let verdict = match outcome {
        ProposeOutcome::Decided(v) => v,
        other => panic!("expected decided verdict, got {other:?}"),
    };
    assert!(!verdict.accepted);
    assert_eq!(verdict.support + verdict.oppose, 1);
}

/// Scenario 4: a validator whose oracle returns unparseable garbage never
/// crashes the deliberation; it defaults to `question` during discussion
/// rounds and `oppose` at the final vote.
#[tokio::test(start_paused = true)]
async fn malformed_oracle_output_defaults_safely() {
    let (container, _dir) = harness(1, 2, 1000).await;
    register(&container, "v1", "Ada", "garbage");
    register(&container, "v2", "Grace", "garbage");

    let ingress = ProposalIngress::new(container.clone());
    let budget = ingress.recommended_wait_budget();
    let outcome = ingress.propose(follow_on_block(&container, vec![]), Some(budget)).await.unwrap();

    // Neither validator ever produces a parseable SUPPORT/OPPOSE during
    // discussion, so both default to `oppose` at the final vote
    // (spec.md Section 4.5 step 3) rather than crashing the driver.
    let verdict = match outcome {
        ProposeOutcome::Decided(v) => v,
        other => panic!("expected decided verdict, got {other:?}"),
    };
    assert!(!verdict.accepted);
    assert_eq!(verdict.support, 0);
    assert_eq!(verdict.oppose, 2);
}

/// Scenario 5: two `Propose` calls on the same chain in quick succession.
/// The first starts a deliberation; the second is rejected with
/// `InProgress`.
#[tokio::test(start_paused = true)]
async fn concurrent_propose_while_active_is_rejected() {
    let (container, _dir) = harness(5, 2, 1000).await;
    register(&container, "v1", "Ada", r#"{"stance":"SUPPORT","reason":"r"}"#);
    register(&container, "v2", "Grace", r#"{"stance":"SUPPORT","reason":"r"}"#);

    let manager = container.consensus_manager("c1");
    manager.propose(follow_on_block(&container, vec![])).unwrap();
    let err = manager.propose(follow_on_block(&container, vec![])).unwrap_err();
    assert_eq!(err, chaoschain_consensus::ConsensusError::InProgress);
}

/// Scenario 6: an accepted block carrying a `REWARD` transaction credits
/// the named recipient and debits the chain's fund pool by the same
/// amount.
#[tokio::test(start_paused = true)]
async fn reward_transaction_in_accepted_block_updates_funds() {
    let (container, _dir) = harness(1, 2, 1000).await;
    register(&container, "v1", "Ada", r#"{"stance":"SUPPORT","reason":"r"}"#);
    register(&container, "v2", "Grace", r#"{"stance":"SUPPORT","reason":"r"}"#);

    let reward_tx = Transaction {
        tx_type: TransactionType::Reward,
        from: Transaction::CHAIN_SENDER.to_string(),
        to: "v1".to_string(),
        amount: 0,
        fee: 0,
        content: String::new(),
        reward: 400,
        timestamp: 0,
        signature: "reward-sig".to_string(),
        public_key: String::new(),
        chain_id: "c1".to_string(),
        data: vec![],
    };

    let ingress = ProposalIngress::new(container.clone());
    let budget = ingress.recommended_wait_budget();
    let outcome = ingress
        .propose(follow_on_block(&container, vec![reward_tx]), Some(budget))
        .await
        .unwrap();

    let verdict = match outcome {
        ProposeOutcome::Decided(v) => v,
        other => panic!("expected decided verdict, got {other:?}"),
    };
    assert!(verdict.accepted);

    let chain = container.chains().get_chain("c1").unwrap();
    let state = chain.state().read();
    assert_eq!(state.height(), 2);
    assert_eq!(state.funds().total_funds(), 600);
    assert_eq!(state.funds().balance_of("v1"), 400);
}
