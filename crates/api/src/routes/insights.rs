use axum::routing::get;
use axum::Router;

use crate::handlers::insights;
use crate::state::AppState;

/// Routes mounted at `/insights`.
///
/// ```text
/// GET  /?drive_id=   -> list
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(insights::list))
}
