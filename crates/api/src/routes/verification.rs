//! Route definitions for outcome verification. Requires a verifier role.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::verification;
use crate::state::AppState;

/// Routes mounted at `/verification`.
///
/// ```text
/// GET  /outcomes        -> list_pending
/// POST /outcomes/{id}   -> decide
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/outcomes", get(verification::list_pending))
        .route("/outcomes/{id}", post(verification::decide))
}
