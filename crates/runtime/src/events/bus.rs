//! Topic-based event bus.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::CombatEvent;

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Combat lifecycle (started, ended, reset).
    Session,
    /// Turn hand-offs and round changes.
    Turns,
    /// Action-point movements.
    Economy,
}

/// Topic-based event bus.
///
/// Consumers subscribe to the topics they care about and only receive those
/// events. Publication is fire-and-forget: a topic with no subscribers drops
/// the event, and a lagging subscriber loses the oldest entries.
///
/// The topic set is closed, so each topic gets its own broadcast channel at
/// construction and no locking is needed afterwards.
#[derive(Clone)]
pub struct EventBus {
    session: broadcast::Sender<CombatEvent>,
    turns: broadcast::Sender<CombatEvent>,
    economy: broadcast::Sender<CombatEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic.
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with the given capacity per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            session: broadcast::channel(capacity).0,
            turns: broadcast::channel(capacity).0,
            economy: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<CombatEvent> {
        match topic {
            Topic::Session => &self.session,
            Topic::Turns => &self.turns,
            Topic::Economy => &self.economy,
        }
    }

    /// Publishes an event to its topic.
    pub fn publish(&self, event: CombatEvent) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic, which is normal.
            tracing::trace!(target: "runtime::events", ?topic, "no subscribers for topic");
        }
    }

    /// Subscribes to a single topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<CombatEvent> {
        self.sender(topic).subscribe()
    }

    /// Subscribes to several topics at once.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<CombatEvent>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::TokenId;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut session_rx = bus.subscribe(Topic::Session);
        let mut economy_rx = bus.subscribe(Topic::Economy);

        bus.publish(CombatEvent::Ended);
        bus.publish(CombatEvent::ActionPointsSpent {
            token_id: TokenId::from("a"),
            amount: 1,
            remaining: 2,
        });

        assert_eq!(session_rx.recv().await.unwrap(), CombatEvent::Ended);
        assert!(matches!(
            economy_rx.recv().await.unwrap(),
            CombatEvent::ActionPointsSpent { amount: 1, .. }
        ));
        // Neither receiver holds the other topic's event.
        assert!(session_rx.try_recv().is_err());
        assert!(economy_rx.try_recv().is_err());
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let bus = EventBus::new();
        bus.publish(CombatEvent::Ended);
    }

    #[tokio::test]
    async fn subscribe_multiple_returns_one_receiver_per_topic() {
        let bus = EventBus::new();
        let mut receivers = bus.subscribe_multiple(&[Topic::Session, Topic::Turns]);
        assert_eq!(receivers.len(), 2);

        bus.publish(CombatEvent::Ended);
        let session_rx = receivers.get_mut(&Topic::Session).unwrap();
        assert_eq!(session_rx.recv().await.unwrap(), CombatEvent::Ended);
    }
}
