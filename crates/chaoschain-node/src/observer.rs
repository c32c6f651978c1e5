//! Observer stream: a read-only subscription to discussion, vote, and
//! verdict events, for UIs and other external watchers (spec.md Section
//! 4.8).

use chaoschain_bus::{DeliberationEvent, EventFilter, EventTopic, Subscription};

use crate::container::NodeContainer;

/// A read-only view onto `AGENT_VOTE.*`, `BLOCK_DISCUSSION_TRIGGER`, and
/// `Verdict` events for one chain, or every chain if `chain_id` is `None`.
pub struct ObserverStream {
    subscription: Subscription,
}

impl ObserverStream {
    #[must_use]
    pub fn new(container: &NodeContainer, chain_id: Option<String>) -> Self {
        let filter = EventFilter {
            topics: vec![
                EventTopic::BlockDiscussionTrigger,
                EventTopic::AgentVote,
                EventTopic::Verdict,
            ],
            chain_id,
        };
        Self {
            subscription: container.bus().subscribe(filter),
        }
    }

    /// Waits for the next observable event, or `None` if the bus has shut
    /// down.
    pub async fn recv(&mut self) -> Option<DeliberationEvent> {
        self.subscription.recv().await
    }
}
