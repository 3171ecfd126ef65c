//! Round outcome model and verification-queue projections.

use placement_core::error::CoreError;
use placement_core::participation::{OutcomeRef, RoundResult};
use placement_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `round_outcomes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoundOutcome {
    pub id: DbId,
    pub student_id: DbId,
    pub round_id: DbId,
    pub result: String,
    pub reflection: Option<String>,
    pub questions: Option<String>,
    pub verified_by: Option<DbId>,
    pub created_at: Timestamp,
}

impl RoundOutcome {
    pub fn parsed_result(&self) -> Result<RoundResult, CoreError> {
        self.result.parse()
    }

    pub fn to_outcome_ref(&self) -> Result<OutcomeRef, CoreError> {
        Ok(OutcomeRef {
            round_id: self.round_id,
            result: self.parsed_result()?,
        })
    }

    pub fn is_verified(&self) -> bool {
        self.verified_by.is_some()
    }
}

/// DTO for inserting a round outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoundOutcome {
    pub student_id: DbId,
    pub round_id: DbId,
    pub result: String,
    pub reflection: Option<String>,
    pub questions: Option<String>,
}

/// An unverified outcome enriched for the verifier's queue.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingOutcome {
    pub id: DbId,
    pub student_id: DbId,
    pub student_name: String,
    pub roll_no: String,
    pub round_id: DbId,
    pub round_name: String,
    pub drive_id: DbId,
    pub company_name: String,
    pub role: String,
    pub result: String,
    pub reflection: Option<String>,
    pub questions: Option<String>,
    pub created_at: Timestamp,
}

/// A verified outcome with a reflection, shared as interview insight.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OutcomeInsight {
    pub id: DbId,
    pub drive_id: DbId,
    pub company_name: String,
    pub role: String,
    pub package: String,
    pub round_name: String,
    pub batch_name: String,
    pub result: String,
    pub reflection: Option<String>,
    pub questions: Option<String>,
    pub created_at: Timestamp,
}
