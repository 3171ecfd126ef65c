//! Handlers for the batch placement dashboard.

use axum::extract::State;
use axum::Json;
use placement_core::stats::placement_percentage;
use placement_core::types::DbId;
use placement_db::models::drive::DriveOfferCount;
use placement_db::repositories::{DriveRepo, ParticipationRepo, StudentRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireVerifier;
use crate::response::DataResponse;
use crate::state::AppState;

/// Placement figures for one batch.
#[derive(Debug, Serialize)]
pub struct PlacementSummary {
    pub batch_id: DbId,
    pub total_students: i64,
    /// Students with at least one OFFERED participation.
    pub placed_students: i64,
    pub unplaced_students: i64,
    /// Placed share of the batch, one decimal place.
    pub placement_percentage: f64,
    /// Drives with at least one offer, most offers first.
    pub offers_by_drive: Vec<DriveOfferCount>,
}

/// GET /api/v1/dashboard/summary
pub async fn summary(
    RequireVerifier(ctx): RequireVerifier,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PlacementSummary>>> {
    let total_students = StudentRepo::count_for_batch(&state.pool, ctx.batch_id).await?;
    let placed_students = ParticipationRepo::count_placed_in_batch(&state.pool, ctx.batch_id).await?;
    let offers_by_drive = DriveRepo::offer_counts_for_batch(&state.pool, ctx.batch_id).await?;

    Ok(Json(DataResponse {
        data: PlacementSummary {
            batch_id: ctx.batch_id,
            total_students,
            placed_students,
            unplaced_students: (total_students - placed_students).max(0),
            placement_percentage: placement_percentage(placed_students, total_students),
            offers_by_drive,
        },
    }))
}
