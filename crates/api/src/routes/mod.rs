pub mod batches;
pub mod dashboard;
pub mod drives;
pub mod health;
pub mod insights;
pub mod student;
pub mod students;
pub mod verification;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                              WebSocket (?token=)
///
/// /student/drives                                  list with own status
/// /student/drives/{id}                             progress view
/// /student/drives/{id}/outcomes                    record outcome (POST)
///
/// /verification/outcomes                           pending queue
/// /verification/outcomes/{id}                      VERIFY / REJECT (POST)
///
/// /batches                                         list, create (super admin)
/// /students                                        roster, enrol
/// /students/{id}/role                              student / class_rep (PATCH)
///
/// /drives                                          list, create
/// /drives/{id}/rounds                              list, add
/// /drives/{id}/offers                              record offer (POST)
/// /drives/{id}/students/{student_id}/active-round  derived active round
///
/// /dashboard/summary                               batch placement summary
///
/// /insights                                        verified reflections
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/student", student::router())
        .nest("/verification", verification::router())
        .nest("/batches", batches::router())
        .nest("/students", students::router())
        .nest("/drives", drives::router())
        .nest("/dashboard", dashboard::router())
        .nest("/insights", insights::router())
}
