//! WebSocket infrastructure for real-time notifications.
//!
//! Provides connection management, heartbeat pings and the authenticated
//! HTTP upgrade handler.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
