use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::students;
use crate::state::AppState;

/// Routes mounted at `/students`.
///
/// ```text
/// GET   /            -> list
/// POST  /            -> create
/// PATCH /{id}/role   -> update_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(students::list).post(students::create))
        .route("/{id}/role", patch(students::update_role))
}
