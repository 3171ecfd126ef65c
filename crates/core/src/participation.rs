//! Drive participation rules.
//!
//! A student's progress through a drive is described by two things only:
//! the round outcomes they have recorded and an optional participation row.
//! The active round is always derived from those, never stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Maximum length for a failure reflection.
pub const MAX_REFLECTION_LENGTH: usize = 5_000;

/// Maximum length for the questions-asked free text.
pub const MAX_QUESTIONS_LENGTH: usize = 5_000;

/* --------------------------------------------------------------------------
Enums
-------------------------------------------------------------------------- */

/// A student's reported result for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundResult {
    Pass,
    Fail,
}

impl RoundResult {
    pub fn as_str(self) -> &'static str {
        match self {
            RoundResult::Pass => "PASS",
            RoundResult::Fail => "FAIL",
        }
    }
}

impl FromStr for RoundResult {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PASS" => Ok(RoundResult::Pass),
            "FAIL" => Ok(RoundResult::Fail),
            other => Err(CoreError::Validation(format!(
                "Invalid result '{other}'. Must be one of: PASS, FAIL"
            ))),
        }
    }
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted status of a participation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipationStatus {
    InProgress,
    Eliminated,
    Offered,
}

impl ParticipationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ParticipationStatus::InProgress => "IN_PROGRESS",
            ParticipationStatus::Eliminated => "ELIMINATED",
            ParticipationStatus::Offered => "OFFERED",
        }
    }

    /// Terminal statuses end progression through the drive's rounds.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ParticipationStatus::Eliminated | ParticipationStatus::Offered
        )
    }
}

impl FromStr for ParticipationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_PROGRESS" => Ok(ParticipationStatus::InProgress),
            "ELIMINATED" => Ok(ParticipationStatus::Eliminated),
            "OFFERED" => Ok(ParticipationStatus::Offered),
            other => Err(CoreError::Validation(format!(
                "Invalid participation status '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ParticipationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status shown on dashboards, where a missing participation means `OPEN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriveStatus {
    Open,
    InProgress,
    Eliminated,
    Offered,
}

impl From<Option<ParticipationStatus>> for DriveStatus {
    fn from(status: Option<ParticipationStatus>) -> Self {
        match status {
            None => DriveStatus::Open,
            Some(ParticipationStatus::InProgress) => DriveStatus::InProgress,
            Some(ParticipationStatus::Eliminated) => DriveStatus::Eliminated,
            Some(ParticipationStatus::Offered) => DriveStatus::Offered,
        }
    }
}

/// A verifier's decision on a submitted outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationDecision {
    Verify,
    Reject,
}

/* --------------------------------------------------------------------------
Derivation
-------------------------------------------------------------------------- */

/// The slice of a round the derivation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRef {
    pub id: DbId,
    pub order_index: i32,
}

/// The slice of a recorded outcome the derivation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeRef {
    pub round_id: DbId,
    pub result: RoundResult,
}

/// Return the round the student should report next, if any.
///
/// Outcomes for rounds outside `rounds` are ignored. `None` means the
/// student is done: eliminated, offered, or every round already has an
/// outcome and the offer decision is pending.
pub fn derive_active_round(
    rounds: &[RoundRef],
    outcomes: &[OutcomeRef],
    status: Option<ParticipationStatus>,
) -> Option<DbId> {
    if status.is_some_and(ParticipationStatus::is_terminal) {
        return None;
    }

    let in_drive: Vec<&OutcomeRef> = outcomes
        .iter()
        .filter(|o| rounds.iter().any(|r| r.id == o.round_id))
        .collect();

    if in_drive.iter().any(|o| o.result == RoundResult::Fail) {
        return None;
    }

    let mut ordered: Vec<&RoundRef> = rounds.iter().collect();
    ordered.sort_by_key(|r| r.order_index);

    ordered
        .into_iter()
        .find(|r| !in_drive.iter().any(|o| o.round_id == r.id))
        .map(|r| r.id)
}

/// Status implied by the remaining outcomes once one has been removed.
///
/// `Offered` is an explicit decision and is never recomputed.
pub fn recompute_status(
    current: ParticipationStatus,
    outcomes: &[OutcomeRef],
) -> ParticipationStatus {
    if current == ParticipationStatus::Offered {
        return current;
    }
    if outcomes.iter().any(|o| o.result == RoundResult::Fail) {
        ParticipationStatus::Eliminated
    } else {
        ParticipationStatus::InProgress
    }
}

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

/// Validate a submission before anything is written.
///
/// A FAIL must carry a non-blank reflection.
pub fn validate_submission(
    result: RoundResult,
    reflection: Option<&str>,
    questions: Option<&str>,
) -> Result<(), CoreError> {
    let reflection = reflection.map(str::trim).filter(|r| !r.is_empty());

    if result == RoundResult::Fail && reflection.is_none() {
        return Err(CoreError::Validation(
            "A reflection is required when reporting a FAIL".to_string(),
        ));
    }

    if reflection.is_some_and(|r| r.chars().count() > MAX_REFLECTION_LENGTH) {
        return Err(CoreError::Validation(format!(
            "Reflection must be at most {MAX_REFLECTION_LENGTH} characters"
        )));
    }

    if questions.is_some_and(|q| q.chars().count() > MAX_QUESTIONS_LENGTH) {
        return Err(CoreError::Validation(format!(
            "Questions must be at most {MAX_QUESTIONS_LENGTH} characters"
        )));
    }

    Ok(())
}

/// An offer may only be recorded for a participation that is still live.
pub fn validate_offer(current: ParticipationStatus) -> Result<(), CoreError> {
    if current == ParticipationStatus::Eliminated {
        return Err(CoreError::Validation(
            "Cannot record an offer for an eliminated participation".to_string(),
        ));
    }
    Ok(())
}
