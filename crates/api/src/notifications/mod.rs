//! Notification delivery.
//!
//! The [`NotificationRouter`] subscribes to the event bus and pushes each
//! event to the WebSocket connections of the addressed student.

pub mod router;

pub use router::NotificationRouter;
