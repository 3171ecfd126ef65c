//! Route definitions for the student portal.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::student;
use crate::state::AppState;

/// Routes mounted at `/student`.
///
/// ```text
/// GET  /drives                  -> list_drives
/// GET  /drives/{id}             -> drive_progress
/// POST /drives/{id}/outcomes    -> record_outcome
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/drives", get(student::list_drives))
        .route("/drives/{id}", get(student::drive_progress))
        .route("/drives/{id}/outcomes", post(student::record_outcome))
}
