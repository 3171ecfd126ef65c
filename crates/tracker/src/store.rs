//! The persistence seam of the participation tracker.

use async_trait::async_trait;
use placement_core::participation::RoundResult;
use placement_core::policy::{DuplicateOutcomePolicy, RejectPolicy};
use placement_core::types::DbId;
use placement_db::models::drive::Drive;
use placement_db::models::participation::Participation;
use placement_db::models::round::Round;
use placement_db::models::round_outcome::{PendingOutcome, RoundOutcome};
use placement_db::models::student::Student;

use crate::error::StoreError;

/// A validated outcome ready to be written.
#[derive(Debug, Clone)]
pub struct NewOutcome {
    pub student_id: DbId,
    pub drive_id: DbId,
    pub round_id: DbId,
    pub result: RoundResult,
    pub reflection: Option<String>,
    pub questions: Option<String>,
}

/// What [`ParticipationStore::record_outcome`] committed.
#[derive(Debug, Clone)]
pub struct RecordedOutcome {
    pub outcome: RoundOutcome,
    /// The participation after the write.
    pub participation: Participation,
    /// Whether this call created the participation.
    pub participation_created: bool,
}

/// What [`ParticipationStore::reject_outcome`] committed.
#[derive(Debug, Clone)]
pub struct RejectedOutcome {
    /// The deleted row.
    pub outcome: RoundOutcome,
    /// The participation after the delete, if one exists.
    pub participation: Option<Participation>,
}

/// Storage backend for the participation tracker.
///
/// Reads are plain lookups. The three writes that touch more than one row
/// ([`record_outcome`](Self::record_outcome),
/// [`reject_outcome`](Self::reject_outcome) and
/// [`promote_to_offered`](Self::promote_to_offered)) must be all-or-nothing:
/// when they return an error, no change is visible to any other call.
///
/// Implementations hold no cached participation or outcome state between
/// calls.
#[async_trait]
pub trait ParticipationStore: Send + Sync + 'static {
    async fn find_student(&self, id: DbId) -> Result<Option<Student>, StoreError>;

    async fn find_drive(&self, id: DbId) -> Result<Option<Drive>, StoreError>;

    async fn find_round(&self, id: DbId) -> Result<Option<Round>, StoreError>;

    /// Rounds of a drive in ascending `order_index`.
    async fn list_rounds(&self, drive_id: DbId) -> Result<Vec<Round>, StoreError>;

    async fn find_participation(
        &self,
        student_id: DbId,
        drive_id: DbId,
    ) -> Result<Option<Participation>, StoreError>;

    /// The student's outcomes for rounds of the drive, newest first.
    async fn list_outcomes(
        &self,
        student_id: DbId,
        drive_id: DbId,
    ) -> Result<Vec<RoundOutcome>, StoreError>;

    async fn find_outcome(&self, id: DbId) -> Result<Option<RoundOutcome>, StoreError>;

    /// Atomically: create the participation if absent, append the outcome
    /// and, on FAIL, set the participation to ELIMINATED.
    ///
    /// Under [`DuplicateOutcomePolicy::Reject`] an existing outcome for the
    /// same (student, round) fails with [`StoreError::Duplicate`] and nothing
    /// is written.
    async fn record_outcome(
        &self,
        outcome: NewOutcome,
        duplicates: DuplicateOutcomePolicy,
    ) -> Result<RecordedOutcome, StoreError>;

    /// Set the verifier of an outcome. `None` if the outcome does not exist.
    async fn mark_verified(
        &self,
        outcome_id: DbId,
        verifier_id: DbId,
    ) -> Result<Option<RoundOutcome>, StoreError>;

    /// Atomically delete an outcome and apply the reject policy to its
    /// participation. `None` if the outcome does not exist.
    async fn reject_outcome(
        &self,
        outcome_id: DbId,
        policy: RejectPolicy,
    ) -> Result<Option<RejectedOutcome>, StoreError>;

    /// Set a participation to OFFERED unless it is ELIMINATED.
    ///
    /// `None` if there is no participation or it is eliminated.
    async fn promote_to_offered(
        &self,
        student_id: DbId,
        drive_id: DbId,
    ) -> Result<Option<Participation>, StoreError>;

    /// Unverified outcomes of students in a batch, newest first.
    async fn list_pending(&self, batch_id: DbId) -> Result<Vec<PendingOutcome>, StoreError>;
}
