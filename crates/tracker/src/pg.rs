//! PostgreSQL-backed [`ParticipationStore`].

use async_trait::async_trait;
use placement_core::participation::{recompute_status, ParticipationStatus, RoundResult};
use placement_core::policy::{DuplicateOutcomePolicy, RejectPolicy};
use placement_core::types::DbId;
use placement_db::models::drive::Drive;
use placement_db::models::participation::Participation;
use placement_db::models::round::Round;
use placement_db::models::round_outcome::{CreateRoundOutcome, PendingOutcome, RoundOutcome};
use placement_db::models::student::Student;
use placement_db::repositories::{
    DriveRepo, ParticipationRepo, RoundOutcomeRepo, RoundRepo, StudentRepo,
};
use placement_db::DbPool;

use crate::error::{corrupt, StoreError};
use crate::store::{NewOutcome, ParticipationStore, RecordedOutcome, RejectedOutcome};

/// Store backed by the placement-db repositories.
///
/// Multi-row writes run in a single transaction. Dropping the transaction on
/// an early `?` return rolls it back.
#[derive(Clone)]
pub struct PgParticipationStore {
    pool: DbPool,
}

impl PgParticipationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipationStore for PgParticipationStore {
    async fn find_student(&self, id: DbId) -> Result<Option<Student>, StoreError> {
        Ok(StudentRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_drive(&self, id: DbId) -> Result<Option<Drive>, StoreError> {
        Ok(DriveRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_round(&self, id: DbId) -> Result<Option<Round>, StoreError> {
        Ok(RoundRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_rounds(&self, drive_id: DbId) -> Result<Vec<Round>, StoreError> {
        Ok(RoundRepo::list_for_drive(&self.pool, drive_id).await?)
    }

    async fn find_participation(
        &self,
        student_id: DbId,
        drive_id: DbId,
    ) -> Result<Option<Participation>, StoreError> {
        Ok(ParticipationRepo::find(&self.pool, student_id, drive_id).await?)
    }

    async fn list_outcomes(
        &self,
        student_id: DbId,
        drive_id: DbId,
    ) -> Result<Vec<RoundOutcome>, StoreError> {
        Ok(RoundOutcomeRepo::list_for_student_drive(&self.pool, student_id, drive_id).await?)
    }

    async fn find_outcome(&self, id: DbId) -> Result<Option<RoundOutcome>, StoreError> {
        Ok(RoundOutcomeRepo::find_by_id(&self.pool, id).await?)
    }

    async fn record_outcome(
        &self,
        outcome: NewOutcome,
        duplicates: DuplicateOutcomePolicy,
    ) -> Result<RecordedOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;

        let participation_created =
            ParticipationRepo::insert_if_absent(&mut *tx, outcome.student_id, outcome.drive_id)
                .await?;

        // Lock the row so concurrent submissions for this drive apply their
        // status writes one after another.
        let participation =
            ParticipationRepo::find_for_update(&mut *tx, outcome.student_id, outcome.drive_id)
                .await?
                .ok_or(StoreError::NotFound {
                    entity: "Participation",
                    id: outcome.drive_id,
                })?;

        if duplicates == DuplicateOutcomePolicy::Reject
            && RoundOutcomeRepo::exists_for_round(&mut *tx, outcome.student_id, outcome.round_id)
                .await?
        {
            return Err(StoreError::Duplicate(format!(
                "An outcome for round {} has already been recorded",
                outcome.round_id
            )));
        }

        let created = RoundOutcomeRepo::create(
            &mut *tx,
            &CreateRoundOutcome {
                student_id: outcome.student_id,
                round_id: outcome.round_id,
                result: outcome.result.as_str().to_string(),
                reflection: outcome.reflection,
                questions: outcome.questions,
            },
        )
        .await?;

        let participation = if outcome.result == RoundResult::Fail {
            ParticipationRepo::set_status(&mut *tx, participation.id, ParticipationStatus::Eliminated)
                .await?
        } else {
            participation
        };

        tx.commit().await?;

        Ok(RecordedOutcome {
            outcome: created,
            participation,
            participation_created,
        })
    }

    async fn mark_verified(
        &self,
        outcome_id: DbId,
        verifier_id: DbId,
    ) -> Result<Option<RoundOutcome>, StoreError> {
        Ok(RoundOutcomeRepo::mark_verified(&self.pool, outcome_id, verifier_id).await?)
    }

    async fn reject_outcome(
        &self,
        outcome_id: DbId,
        policy: RejectPolicy,
    ) -> Result<Option<RejectedOutcome>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let Some(outcome) = RoundOutcomeRepo::delete(&mut *tx, outcome_id).await? else {
            return Ok(None);
        };

        let round = RoundRepo::find_by_id(&mut *tx, outcome.round_id)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "Round",
                id: outcome.round_id,
            })?;

        let participation =
            ParticipationRepo::find_for_update(&mut *tx, outcome.student_id, round.drive_id)
                .await?;

        let participation = match (policy, participation) {
            (RejectPolicy::Recompute, Some(current)) => {
                let remaining = RoundOutcomeRepo::list_for_student_drive(
                    &mut *tx,
                    outcome.student_id,
                    round.drive_id,
                )
                .await?;
                let refs = remaining
                    .iter()
                    .map(RoundOutcome::to_outcome_ref)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(corrupt)?;
                let status = current.parsed_status().map_err(corrupt)?;
                let next = recompute_status(status, &refs);
                if next == status {
                    Some(current)
                } else {
                    Some(ParticipationRepo::set_status(&mut *tx, current.id, next).await?)
                }
            }
            (_, participation) => participation,
        };

        tx.commit().await?;

        Ok(Some(RejectedOutcome {
            outcome,
            participation,
        }))
    }

    async fn promote_to_offered(
        &self,
        student_id: DbId,
        drive_id: DbId,
    ) -> Result<Option<Participation>, StoreError> {
        Ok(ParticipationRepo::promote_to_offered(&self.pool, student_id, drive_id).await?)
    }

    async fn list_pending(&self, batch_id: DbId) -> Result<Vec<PendingOutcome>, StoreError> {
        Ok(RoundOutcomeRepo::list_pending_for_batch(&self.pool, batch_id).await?)
    }
}
