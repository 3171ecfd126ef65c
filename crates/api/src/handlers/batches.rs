//! Handlers for the `/batches` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use placement_core::types::DbId;
use placement_db::models::batch::{Batch, CreateBatch};
use placement_db::repositories::BatchRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::rbac::RequireSuperAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /batches`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBatchRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Staff id of the batch's placement representative.
    pub placement_rep_id: Option<DbId>,
}

/// POST /api/v1/batches
///
/// A duplicate name is a 409.
pub async fn create(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateBatchRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let batch = BatchRepo::create(
        &state.pool,
        &CreateBatch {
            name: input.name.trim().to_string(),
            placement_rep_id: input.placement_rep_id,
        },
    )
    .await?;

    tracing::info!(batch_id = batch.id, actor_id = admin.user_id, "Batch created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: batch })))
}

/// GET /api/v1/batches
pub async fn list(
    _admin: RequireSuperAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Batch>>>> {
    let batches = BatchRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: batches }))
}
