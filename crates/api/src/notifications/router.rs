//! Event-to-socket routing.
//!
//! Events addressed to `student-{id}` go to every socket the student has
//! open. Anything else is dropped. Delivery is best effort: a student with no open socket simply
//! misses the push and sees the verified outcome on their next read.

use std::sync::Arc;

use axum::extract::ws::Message;
use placement_core::channels::parse_student_channel;
use placement_events::PlatformEvent;
use tokio::sync::broadcast;

use crate::ws::WsManager;

/// Routes platform events to connected WebSocket clients.
pub struct NotificationRouter {
    ws_manager: Arc<WsManager>,
}

impl NotificationRouter {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the routing loop until the [`EventBus`](placement_events::EventBus)
    /// is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let delivered = self.route_event(&event).await;
                    tracing::debug!(
                        event_type = %event.event_type,
                        channel = %event.channel,
                        delivered,
                        "Event routed",
                    );
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Deliver one event. Returns the number of sockets it was pushed to.
    pub async fn route_event(&self, event: &PlatformEvent) -> usize {
        let Some(student_id) = parse_student_channel(&event.channel) else {
            tracing::debug!(channel = %event.channel, "No route for channel, skipping");
            return 0;
        };

        let message = Message::Text(notification_frame(event).to_string().into());
        self.ws_manager.notify_student(student_id, message).await
    }
}

/// JSON frame sent to clients for a single event.
fn notification_frame(event: &PlatformEvent) -> serde_json::Value {
    serde_json::json!({
        "type": "notification",
        "event_type": event.event_type,
        "channel": event.channel,
        "outcome_id": event.outcome_id,
        "payload": event.payload,
        "timestamp": event.timestamp,
    })
}
