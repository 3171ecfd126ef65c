//! Handlers for the `/drives` resource: drive and round administration,
//! per-student progress lookups and offer decisions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use placement_core::error::CoreError;
use placement_core::types::{DbId, Timestamp};
use placement_db::models::drive::{CreateDrive, Drive};
use placement_db::models::participation::Participation;
use placement_db::models::round::{CreateRound, Round};
use placement_db::repositories::{DriveRepo, RoundRepo, StudentRepo};
use placement_db::DbPool;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireVerifier};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /drives`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriveRequest {
    #[validate(length(min = 1, max = 200))]
    pub company_name: String,
    #[validate(length(min = 1, max = 200))]
    pub role: String,
    #[validate(length(max = 100))]
    pub package: Option<String>,
    pub drive_date: Option<Timestamp>,
}

/// Request body for `POST /drives/{id}/rounds`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoundRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 0))]
    pub order_index: i32,
}

/// Request body for `POST /drives/{id}/offers`.
#[derive(Debug, Deserialize)]
pub struct RecordOfferRequest {
    pub student_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct ActiveRoundResponse {
    pub student_id: DbId,
    pub drive_id: DbId,
    pub active_round_id: Option<DbId>,
}

/// POST /api/v1/drives
///
/// Create a drive in the caller's batch.
pub async fn create_drive(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateDriveRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let drive = DriveRepo::create(
        &state.pool,
        &CreateDrive {
            batch_id: ctx.batch_id,
            company_name: input.company_name.trim().to_string(),
            role: input.role.trim().to_string(),
            package: input.package,
            drive_date: input.drive_date,
        },
    )
    .await?;

    tracing::info!(
        drive_id = drive.id,
        batch_id = ctx.batch_id,
        actor_id = ctx.actor_id,
        "Drive created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: drive })))
}

/// GET /api/v1/drives
///
/// Drives of the caller's batch, most recent first.
pub async fn list_drives(
    RequireVerifier(ctx): RequireVerifier,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Drive>>>> {
    let drives = DriveRepo::list_for_batch(&state.pool, ctx.batch_id).await?;
    Ok(Json(DataResponse { data: drives }))
}

/// POST /api/v1/drives/{id}/rounds
///
/// Add a round. A duplicate `order_index` within the drive is a 409.
pub async fn add_round(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    Path(drive_id): Path<DbId>,
    Json(input): Json<CreateRoundRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_drive_in_batch(&state.pool, drive_id, ctx.batch_id).await?;

    let round = RoundRepo::create(
        &state.pool,
        &CreateRound {
            drive_id,
            name: input.name.trim().to_string(),
            order_index: input.order_index,
        },
    )
    .await?;

    tracing::info!(
        drive_id,
        round_id = round.id,
        order_index = round.order_index,
        "Round added",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: round })))
}

/// GET /api/v1/drives/{id}/rounds
///
/// Rounds of a drive in progression order.
pub async fn list_rounds(
    user: AuthUser,
    State(state): State<AppState>,
    Path(drive_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Round>>>> {
    ensure_drive_in_batch(&state.pool, drive_id, user.batch_scope()?).await?;
    let rounds = RoundRepo::list_for_drive(&state.pool, drive_id).await?;
    Ok(Json(DataResponse { data: rounds }))
}

/// GET /api/v1/drives/{id}/students/{student_id}/active-round
///
/// The round a student of the caller's batch should report next.
pub async fn student_active_round(
    RequireVerifier(ctx): RequireVerifier,
    State(state): State<AppState>,
    Path((drive_id, student_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<ActiveRoundResponse>>> {
    ensure_drive_in_batch(&state.pool, drive_id, ctx.batch_id).await?;
    let student = StudentRepo::find_by_id(&state.pool, student_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Student",
            id: student_id,
        })?;
    ctx.ensure_batch(student.batch_id)?;

    let active_round_id = state
        .tracker
        .derive_active_round(student_id, drive_id)
        .await?;

    Ok(Json(DataResponse {
        data: ActiveRoundResponse {
            student_id,
            drive_id,
            active_round_id,
        },
    }))
}

/// POST /api/v1/drives/{id}/offers
///
/// Mark a student's participation in the drive as OFFERED.
pub async fn record_offer(
    RequireVerifier(ctx): RequireVerifier,
    State(state): State<AppState>,
    Path(drive_id): Path<DbId>,
    Json(input): Json<RecordOfferRequest>,
) -> AppResult<Json<DataResponse<Participation>>> {
    let participation = state
        .tracker
        .record_offer(&ctx, input.student_id, drive_id)
        .await?;
    Ok(Json(DataResponse {
        data: participation,
    }))
}

async fn ensure_drive_in_batch(
    pool: &DbPool,
    drive_id: DbId,
    batch_id: DbId,
) -> Result<Drive, AppError> {
    let drive = DriveRepo::find_by_id(pool, drive_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Drive",
            id: drive_id,
        })?;
    if drive.batch_id != batch_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Drive belongs to a different batch".into(),
        )));
    }
    Ok(drive)
}
