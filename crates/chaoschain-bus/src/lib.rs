//! # ChaosChain Bus
//!
//! In-process topic-based publish/subscribe fabric that carries discussion
//! and vote events between the Consensus Manager, Validator Agents, and
//! external observers (spec.md Section 4.1).
//!
//! Delivery is at-least-once, best-effort within the process: a lagging
//! subscriber drops its oldest buffered events rather than stalling
//! publishers, so the core never assumes lossless delivery (spec.md
//! Section 8).

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{DeliberationEvent, EventFilter, EventTopic};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_matches_constant() {
        let bus = InMemoryEventBus::new();
        assert_eq!(bus.capacity(), DEFAULT_CHANNEL_CAPACITY);
    }
}
