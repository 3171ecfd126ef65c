use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Open notification sockets.
    pub ws_connections: usize,
    /// Distinct students with an open socket.
    pub students_online: usize,
}

/// GET /health -- service, database and socket health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = placement_db::health_check(&state.pool).await.is_ok();
    let ws_connections = state.ws_manager.connection_count().await;
    let students_online = state.ws_manager.students_online().await;

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        ws_connections,
        students_online,
    })
}

/// Mount health check routes (root level, not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
