//! Handlers for the `/verification` resource: the representative's queue of
//! unverified outcomes and the verify / reject decision.

use axum::extract::{Path, State};
use axum::Json;
use placement_core::participation::VerificationDecision;
use placement_core::types::DbId;
use placement_db::models::participation::Participation;
use placement_db::models::round_outcome::{PendingOutcome, RoundOutcome};
use placement_tracker::VerificationOutcome;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::rbac::RequireVerifier;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /verification/outcomes/{id}`.
#[derive(Debug, Deserialize)]
pub struct VerificationRequest {
    /// `VERIFY` or `REJECT`.
    pub action: VerificationDecision,
}

#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationResponse {
    Verify {
        outcome: RoundOutcome,
    },
    Reject {
        outcome_id: DbId,
        participation: Option<Participation>,
    },
}

impl From<VerificationOutcome> for VerificationResponse {
    fn from(outcome: VerificationOutcome) -> Self {
        match outcome {
            VerificationOutcome::Verified(outcome) => VerificationResponse::Verify { outcome },
            VerificationOutcome::Rejected(rejected) => VerificationResponse::Reject {
                outcome_id: rejected.outcome.id,
                participation: rejected.participation,
            },
        }
    }
}

/// GET /api/v1/verification/outcomes
///
/// Unverified outcomes of students in the caller's batch, newest first.
pub async fn list_pending(
    RequireVerifier(ctx): RequireVerifier,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PendingOutcome>>>> {
    let pending = state.tracker.pending_outcomes(&ctx).await?;
    Ok(Json(DataResponse { data: pending }))
}

/// POST /api/v1/verification/outcomes/{id}
///
/// Verify or reject one outcome. Rejection deletes it.
pub async fn decide(
    RequireVerifier(ctx): RequireVerifier,
    State(state): State<AppState>,
    Path(outcome_id): Path<DbId>,
    Json(input): Json<VerificationRequest>,
) -> AppResult<Json<DataResponse<VerificationResponse>>> {
    let outcome = state.tracker.verify(&ctx, outcome_id, input.action).await?;
    Ok(Json(DataResponse {
        data: outcome.into(),
    }))
}
