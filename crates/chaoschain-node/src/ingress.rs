//! Proposal ingress: the narrow facade external callers (HTTP/WS surface,
//! CLI, peer network — all out of this core's scope per spec.md Section 1)
//! use to submit a block and optionally wait for its verdict.
//!
//! Reference: spec.md Section 4.8/6, modeled on
//! `node_runtime::adapters::api_gateway`'s thin facade-over-core-trait
//! style: this type owns no state of its own beyond the
//! `ConsensusManager` it wraps.

use chaoschain_consensus::{ConsensusError, Verdict};
use chaoschain_types::{Block, Hash};
use std::sync::Arc;
use std::time::Duration;

use crate::container::NodeContainer;

/// Result of a `wait=true` proposal once the external waiter's deadline has
/// elapsed without a verdict (spec.md Section 7, `DeliberationTimeout`): the
/// driver keeps running independently, but this caller gives up.
#[derive(Debug, Clone)]
pub enum ProposeOutcome {
    /// `wait=false`: the block was accepted for deliberation.
    AcceptedForDeliberation { thread_id: Hash },
    /// `wait=true` and the driver produced a verdict within budget.
    Decided(Verdict),
    /// `wait=true` and the deadline elapsed first.
    Timeout,
}

/// `Propose(block, opts{wait, ...})` (spec.md Section 6).
pub struct ProposalIngress {
    container: NodeContainer,
}

impl ProposalIngress {
    #[must_use]
    pub fn new(container: NodeContainer) -> Self {
        Self { container }
    }

    /// Submits `block` for deliberation on its chain. If `wait` is `None`
    /// returns immediately with the thread id (the block's hash). If
    /// `Some(deadline)`, blocks up to `deadline` for the verdict, returning
    /// `Timeout` if the deadline elapses first (the deliberation itself is
    /// not canceled; spec.md Section 5, "Cancellation and timeouts").
    pub async fn propose(
        &self,
        block: Block,
        wait: Option<Duration>,
    ) -> Result<ProposeOutcome, ConsensusError> {
        let manager = self.container.consensus_manager(&block.chain_id.clone());
        let height = block.height;
        let thread_id = block.hash();

        let Some(deadline) = wait else {
            manager.propose(block)?;
            return Ok(ProposeOutcome::AcceptedForDeliberation { thread_id });
        };

        let (tx, rx) = tokio::sync::oneshot::channel();
        manager.subscribe_result(height, tx);
        manager.propose(block)?;

        match tokio::time::timeout(deadline, rx).await {
            Ok(Ok(verdict)) => Ok(ProposeOutcome::Decided(verdict)),
            Ok(Err(_)) | Err(_) => Ok(ProposeOutcome::Timeout),
        }
    }

    /// The caller-side upper bound recommended by spec.md Section 5: the
    /// deliberation's own total budget plus a small safety margin.
    #[must_use]
    pub fn recommended_wait_budget(&self) -> Duration {
        self.container.config().consensus.driver_wait() + Duration::from_secs(2)
    }
}
