//! Registry of open notification sockets.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use placement_core::types::{DbId, Timestamp};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Identifies one socket for its lifetime.
pub type ConnId = Uuid;

struct Subscriber {
    /// Staff sockets have no student and only see broadcasts.
    student_id: Option<DbId>,
    outbox: mpsc::UnboundedSender<Message>,
    opened_at: Timestamp,
}

/// Open sockets, shared as `Arc<WsManager>` by the upgrade handler, the
/// heartbeat and the notification router.
///
/// Each socket gets an unbounded outbox; the handler's send task drains it
/// into the sink. A socket whose task has ended just stops accepting
/// messages until the handler unregisters it.
#[derive(Default)]
pub struct WsManager {
    subscribers: RwLock<HashMap<ConnId, Subscriber>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a socket and return its id plus the outbox receiver.
    pub async fn register(
        &self,
        student_id: Option<DbId>,
    ) -> (ConnId, mpsc::UnboundedReceiver<Message>) {
        let conn_id = Uuid::new_v4();
        let (outbox, rx) = mpsc::unbounded_channel();
        self.subscribers.write().await.insert(
            conn_id,
            Subscriber {
                student_id,
                outbox,
                opened_at: chrono::Utc::now(),
            },
        );
        (conn_id, rx)
    }

    /// Forget a socket. Returns how long it was open, if it was known.
    pub async fn unregister(&self, conn_id: ConnId) -> Option<chrono::Duration> {
        self.subscribers
            .write()
            .await
            .remove(&conn_id)
            .map(|sub| chrono::Utc::now() - sub.opened_at)
    }

    /// Queue `message` on every socket of one student and return how many
    /// accepted it.
    pub async fn notify_student(&self, student_id: DbId, message: Message) -> usize {
        self.subscribers
            .read()
            .await
            .values()
            .filter(|sub| sub.student_id == Some(student_id))
            .filter(|sub| sub.outbox.send(message.clone()).is_ok())
            .count()
    }

    /// Queue `message` on every socket and return how many accepted it.
    pub async fn broadcast(&self, message: Message) -> usize {
        self.subscribers
            .read()
            .await
            .values()
            .filter(|sub| sub.outbox.send(message.clone()).is_ok())
            .count()
    }

    pub async fn ping_all(&self) -> usize {
        self.broadcast(Message::Ping(Bytes::new())).await
    }

    pub async fn connection_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Number of distinct students with at least one open socket.
    pub async fn students_online(&self) -> usize {
        let subscribers = self.subscribers.read().await;
        let mut students: Vec<DbId> = subscribers.values().filter_map(|s| s.student_id).collect();
        students.sort_unstable();
        students.dedup();
        students.len()
    }

    /// Send Close to every socket and empty the registry.
    pub async fn close_all(&self) {
        let mut subscribers = self.subscribers.write().await;
        for sub in subscribers.values() {
            let _ = sub.outbox.send(Message::Close(None));
        }
        tracing::info!(count = subscribers.len(), "Closed all WebSocket connections");
        subscribers.clear();
    }
}
