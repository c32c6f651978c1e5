//! # Event Publisher
//!
//! The publishing side of the bus.

use crate::events::{DeliberationEvent, EventFilter};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for publishing events to the bus.
///
/// Reference: spec.md Section 4.1 - `Publish(subject, payload)` is
/// non-blocking from the publisher's perspective and best-effort at-least
/// once within the process.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event. Returns the number of subscribers that currently
    /// hold a receiver (delivery to each is still best-effort: a slow
    /// subscriber may miss it if its channel buffer overflows).
    async fn publish(&self, event: DeliberationEvent) -> usize;

    /// Total events published (attempted, whether or not delivered).
    fn events_published(&self) -> u64;
}

/// In-memory implementation of the bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer multi-consumer fan-out,
/// matching spec.md Section 4.1's "the core must not assume lossless
/// delivery" contract: a lagging subscriber's oldest buffered messages are
/// dropped rather than stalling the publisher.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<DeliberationEvent>,
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,
    events_published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events matching a filter.
    ///
    /// Reference: spec.md Section 4.1 - `Subscribe(subject, handler)`.
    /// Registration must happen before `publish` is called for the
    /// subscriber to observe that event (spec.md Section 8, "Broker
    /// delivery").
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        let topic_key = format!("{:?}/{:?}", filter.topics, filter.chain_id);

        if let Ok(mut subs) = self.subscriptions.write() {
            *subs.entry(topic_key.clone()).or_insert(0) += 1;
        }

        debug!(topics = ?filter.topics, chain = ?filter.chain_id, "new bus subscription");

        Subscription::new(receiver, filter, self.subscriptions.clone(), topic_key)
    }

    /// Convenience wrapper returning a `Stream` of matching events.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.subscribe(filter))
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: DeliberationEvent) -> usize {
        let subject = event.subject();
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(subject = %subject, receivers = receiver_count, "event published");
                receiver_count
            }
            Err(_) => {
                warn!(subject = %subject, "event dropped (no receivers)");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventTopic;
    use chaoschain_types::Block;

    fn trigger_event() -> DeliberationEvent {
        DeliberationEvent::BlockDiscussionTrigger {
            chain_id: "c1".to_string(),
            block: Block::genesis("c1".to_string(), 0),
        }
    }

    #[tokio::test]
    async fn publish_with_no_subscribers_counts_but_drops() {
        let bus = InMemoryEventBus::new();
        let receivers = bus.publish(trigger_event()).await;
        assert_eq!(receivers, 0);
        assert_eq!(bus.events_published(), 1);
    }

    #[tokio::test]
    async fn subscriber_registered_before_publish_receives_it() {
        let bus = InMemoryEventBus::new();
        let _sub = bus.subscribe(EventFilter::all());
        let receivers = bus.publish(trigger_event()).await;
        assert_eq!(receivers, 1);
    }

    #[tokio::test]
    async fn multiple_subscribers_all_count() {
        let bus = InMemoryEventBus::new();
        let _a = bus.subscribe(EventFilter::all());
        let _b = bus.subscribe(EventFilter::all());
        let _c = bus.subscribe(EventFilter::topics(vec![EventTopic::BlockDiscussionTrigger]));
        let receivers = bus.publish(trigger_event()).await;
        assert_eq!(receivers, 3);
    }
}
