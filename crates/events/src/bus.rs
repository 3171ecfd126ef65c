//! Notification events and the in-process bus that carries them.
//!
//! The tracker publishes; the API's notification router subscribes and
//! forwards to sockets. Nothing here persists events: a notice nobody is
//! listening for is gone.

use chrono::{DateTime, Utc};
use placement_core::channels::{student_channel, EVENT_OUTCOME_VERIFIED, OUTCOME_VERIFIED_MESSAGE};
use placement_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Buffered events per subscriber before the slowest one starts lagging.
const DEFAULT_CAPACITY: usize = 1024;

/// One notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// e.g. `outcome-verified`.
    pub event_type: String,
    /// Delivery address, e.g. `student-{id}`.
    pub channel: String,
    pub outcome_id: Option<DbId>,
    pub actor_id: Option<DbId>,
    /// Body handed to the client as-is.
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    /// An event for the subscribers of one channel.
    pub fn for_channel(
        event_type: impl Into<String>,
        channel: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            channel: channel.into(),
            outcome_id: None,
            actor_id: None,
            payload,
            timestamp: Utc::now(),
        }
    }

    /// Tells a student that a verifier accepted one of their outcomes.
    pub fn outcome_verified(student_id: DbId, outcome_id: DbId, verifier_id: DbId) -> Self {
        Self {
            outcome_id: Some(outcome_id),
            actor_id: Some(verifier_id),
            ..Self::for_channel(
                EVENT_OUTCOME_VERIFIED,
                student_channel(student_id),
                serde_json::json!({ "message": OUTCOME_VERIFIED_MESSAGE }),
            )
        }
    }
}

/// Fan-out bus over `tokio::sync::broadcast`, shared as `Arc<EventBus>`.
///
/// ```rust
/// use placement_events::{EventBus, PlatformEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
/// assert_eq!(bus.publish(PlatformEvent::outcome_verified(42, 7, 3)), 1);
/// assert!(rx.try_recv().is_ok());
/// ```
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Hand `event` to every live subscriber and return how many there were.
    ///
    /// Never fails; with no subscribers the event is discarded.
    pub fn publish(&self, event: PlatformEvent) -> usize {
        self.sender.send(event).unwrap_or_else(|unsent| {
            tracing::debug!(
                event_type = %unsent.0.event_type,
                channel = %unsent.0.channel,
                "No subscribers, event dropped",
            );
            0
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_verified_targets_the_student_channel() {
        let event = PlatformEvent::outcome_verified(42, 5, 3);

        assert_eq!(event.event_type, "outcome-verified");
        assert_eq!(event.channel, "student-42");
        assert_eq!(event.outcome_id, Some(5));
        assert_eq!(event.actor_id, Some(3));
        assert_eq!(
            event.payload,
            serde_json::json!({ "message": "Your round outcome has been verified!" })
        );
    }

    #[test]
    fn channel_event_carries_no_outcome() {
        let event = PlatformEvent::for_channel("maintenance", "student-3", serde_json::json!({}));
        assert_eq!(event.channel, "student-3");
        assert!(event.outcome_id.is_none());
        assert!(event.actor_id.is_none());
    }

    #[tokio::test]
    async fn every_subscriber_gets_a_copy() {
        let bus = EventBus::new(8);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        let delivered = bus.publish(PlatformEvent::for_channel(
            "outcome-verified",
            "student-9",
            serde_json::json!({ "message": "hi" }),
        ));

        assert_eq!(delivered, 2);
        let a = first.recv().await.unwrap();
        let b = second.recv().await.unwrap();
        assert_eq!(a.channel, "student-9");
        assert_eq!(b.payload["message"], "hi");
    }

    #[test]
    fn publishing_without_subscribers_is_not_an_error() {
        let bus = EventBus::default();
        assert_eq!(bus.publish(PlatformEvent::outcome_verified(1, 2, 3)), 0);
    }

    #[tokio::test]
    async fn dropped_bus_closes_receivers() {
        let bus = EventBus::new(4);
        let mut rx = bus.subscribe();
        drop(bus);

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }
}
