use std::sync::Arc;

use placement_events::EventBus;
use placement_tracker::ParticipationTracker;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, for reads that bypass the tracker.
    pub pool: placement_db::DbPool,
    /// Server configuration (JWT settings are read by the auth extractors).
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager.
    pub ws_manager: Arc<WsManager>,
    /// Event bus the tracker publishes verification notices on.
    pub event_bus: Arc<EventBus>,
    /// The participation tracker.
    pub tracker: Arc<ParticipationTracker>,
}
