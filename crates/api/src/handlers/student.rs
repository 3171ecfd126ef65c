//! Handlers for the `/student` resource: the caller's own drives and
//! outcome submissions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use placement_core::participation::{DriveStatus, ParticipationStatus, RoundResult};
use placement_core::types::{DbId, Timestamp};
use placement_db::models::drive::StudentDriveRow;
use placement_db::models::participation::Participation;
use placement_db::models::round_outcome::RoundOutcome;
use placement_db::repositories::DriveRepo;
use placement_tracker::{DriveProgress, OutcomeSubmission};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::rbac::RequireStudent;
use crate::response::DataResponse;
use crate::state::AppState;

/// A drive in the student's batch with the student's status in it.
#[derive(Debug, Serialize)]
pub struct StudentDrive {
    pub id: DbId,
    pub company_name: String,
    pub role: String,
    pub package: String,
    pub drive_date: Option<Timestamp>,
    pub round_count: i64,
    pub status: DriveStatus,
}

impl TryFrom<StudentDriveRow> for StudentDrive {
    type Error = placement_core::error::CoreError;

    fn try_from(row: StudentDriveRow) -> Result<Self, Self::Error> {
        let status = row
            .participation_status
            .as_deref()
            .map(str::parse::<ParticipationStatus>)
            .transpose()?;
        Ok(StudentDrive {
            id: row.id,
            company_name: row.company_name,
            role: row.role,
            package: row.package,
            drive_date: row.drive_date,
            round_count: row.round_count,
            status: DriveStatus::from(status),
        })
    }
}

/// Request body for `POST /student/drives/{id}/outcomes`.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordOutcomeRequest {
    pub round_id: DbId,
    /// `PASS` or `FAIL`.
    #[validate(length(min = 1, max = 16))]
    pub result: String,
    pub reflection: Option<String>,
    pub questions: Option<String>,
}

/// What the student sees after submitting.
#[derive(Debug, Serialize)]
pub struct RecordOutcomeResponse {
    pub outcome: RoundOutcome,
    pub participation: Participation,
    pub active_round_id: Option<DbId>,
}

/// GET /api/v1/student/drives
///
/// Drives of the caller's batch. Drives without a participation report
/// `OPEN`.
pub async fn list_drives(
    RequireStudent(ctx): RequireStudent,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<StudentDrive>>>> {
    let rows = DriveRepo::list_for_student(&state.pool, ctx.batch_id, ctx.student_id).await?;
    let drives = rows
        .into_iter()
        .map(StudentDrive::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse { data: drives }))
}

/// GET /api/v1/student/drives/{id}
///
/// Rounds, the caller's outcomes and the derived active round.
pub async fn drive_progress(
    RequireStudent(ctx): RequireStudent,
    State(state): State<AppState>,
    Path(drive_id): Path<DbId>,
) -> AppResult<Json<DataResponse<DriveProgress>>> {
    let progress = state.tracker.drive_progress(&ctx, drive_id).await?;
    Ok(Json(DataResponse { data: progress }))
}

/// POST /api/v1/student/drives/{id}/outcomes
///
/// Record the caller's result for one round of the drive.
pub async fn record_outcome(
    RequireStudent(ctx): RequireStudent,
    State(state): State<AppState>,
    Path(drive_id): Path<DbId>,
    Json(input): Json<RecordOutcomeRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let result: RoundResult = input.result.trim().parse()?;

    let recorded = state
        .tracker
        .record_outcome(
            &ctx,
            OutcomeSubmission {
                drive_id,
                round_id: input.round_id,
                result,
                reflection: input.reflection,
                questions: input.questions,
            },
        )
        .await?;

    let active_round_id = state
        .tracker
        .derive_active_round(ctx.student_id, drive_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RecordOutcomeResponse {
                outcome: recorded.outcome,
                participation: recorded.participation,
                active_round_id,
            },
        }),
    ))
}
