//! Handlers for the `/students` resource: the batch roster.
//!
//! Students are always created in, and looked up within, the caller's
//! batch; the body never names a batch.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use placement_core::error::CoreError;
use placement_core::roles;
use placement_core::types::DbId;
use placement_db::models::student::{CreateStudent, Student};
use placement_db::repositories::StudentRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireVerifier};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /students`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub roll_no: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub is_class_rep: bool,
}

/// Request body for `PATCH /students/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateStudentRoleRequest {
    /// `student` or `class_rep`.
    pub role: String,
}

/// POST /api/v1/students
///
/// Enrol a student in the caller's batch. A reused email, or a roll
/// number already taken in the batch, is a 409.
pub async fn create(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateStudentRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let student = StudentRepo::create(
        &state.pool,
        &CreateStudent {
            batch_id: ctx.batch_id,
            name: input.name.trim().to_string(),
            roll_no: input.roll_no.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            is_class_rep: Some(input.is_class_rep),
        },
    )
    .await?;

    tracing::info!(
        student_id = student.id,
        batch_id = ctx.batch_id,
        actor_id = ctx.actor_id,
        "Student enrolled",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: student })))
}

/// GET /api/v1/students
pub async fn list(
    RequireVerifier(ctx): RequireVerifier,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Student>>>> {
    let students = StudentRepo::list_for_batch(&state.pool, ctx.batch_id).await?;
    Ok(Json(DataResponse { data: students }))
}

/// PATCH /api/v1/students/{id}/role
///
/// Switch a student between `student` and `class_rep`. Takes effect on
/// the student's next token.
pub async fn update_role(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    Path(student_id): Path<DbId>,
    Json(input): Json<UpdateStudentRoleRequest>,
) -> AppResult<Json<DataResponse<Student>>> {
    let is_class_rep = match input.role.as_str() {
        roles::ROLE_STUDENT => false,
        roles::ROLE_CLASS_REP => true,
        other => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid student role '{other}'. Must be one of: {}, {}",
                roles::ROLE_STUDENT,
                roles::ROLE_CLASS_REP,
            ))))
        }
    };

    let student = StudentRepo::find_by_id(&state.pool, student_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Student",
            id: student_id,
        })?;
    if student.batch_id != ctx.batch_id {
        return Err(CoreError::Forbidden("Student belongs to a different batch".into()).into());
    }

    let updated = StudentRepo::set_class_rep(&state.pool, student_id, is_class_rep)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Student",
            id: student_id,
        })?;

    tracing::info!(
        student_id,
        is_class_rep,
        actor_id = ctx.actor_id,
        "Student role updated",
    );

    Ok(Json(DataResponse { data: updated }))
}
