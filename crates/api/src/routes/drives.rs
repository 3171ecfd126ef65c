use axum::routing::{get, post};
use axum::Router;

use crate::handlers::drives;
use crate::state::AppState;

/// Routes mounted at `/drives`.
///
/// ```text
/// GET  /                                         -> list_drives
/// POST /                                         -> create_drive
/// GET  /{id}/rounds                              -> list_rounds
/// POST /{id}/rounds                              -> add_round
/// POST /{id}/offers                              -> record_offer
/// GET  /{id}/students/{student_id}/active-round  -> student_active_round
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(drives::list_drives).post(drives::create_drive))
        .route(
            "/{id}/rounds",
            get(drives::list_rounds).post(drives::add_round),
        )
        .route("/{id}/offers", post(drives::record_offer))
        .route(
            "/{id}/students/{student_id}/active-round",
            get(drives::student_active_round),
        )
}
