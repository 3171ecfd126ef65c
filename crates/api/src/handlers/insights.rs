//! Handlers for shared interview insights.

use axum::extract::{Query, State};
use axum::Json;
use placement_core::types::DbId;
use placement_db::models::round_outcome::OutcomeInsight;
use placement_db::repositories::RoundOutcomeRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum number of insights returned per request.
const INSIGHTS_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct InsightsQuery {
    pub drive_id: Option<DbId>,
    /// Case-insensitive substring of the drive's role title.
    pub role: Option<String>,
}

/// GET /api/v1/insights
///
/// Verified outcomes that carry a reflection, newest first.
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<InsightsQuery>,
) -> AppResult<Json<DataResponse<Vec<OutcomeInsight>>>> {
    let role = params.role.as_deref().map(str::trim).filter(|r| !r.is_empty());
    let insights =
        RoundOutcomeRepo::list_insights(&state.pool, params.drive_id, role, INSIGHTS_LIMIT).await?;
    Ok(Json(DataResponse { data: insights }))
}
