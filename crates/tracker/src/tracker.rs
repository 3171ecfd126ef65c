//! Outcome recording, active-round derivation and verification.

use std::sync::Arc;

use placement_core::error::CoreError;
use placement_core::participation::{
    derive_active_round, validate_offer, validate_submission, DriveStatus, RoundResult,
    VerificationDecision,
};
use placement_core::policy::TrackerPolicy;
use placement_core::types::DbId;
use placement_db::models::drive::Drive;
use placement_db::models::participation::Participation;
use placement_db::models::round::Round;
use placement_db::models::round_outcome::{PendingOutcome, RoundOutcome};
use placement_events::{EventBus, PlatformEvent};
use serde::Serialize;

use crate::context::{StudentContext, VerifierContext};
use crate::error::corrupt;
use crate::store::{NewOutcome, ParticipationStore, RecordedOutcome, RejectedOutcome};

/// A student's report for one round, before validation.
#[derive(Debug, Clone)]
pub struct OutcomeSubmission {
    pub drive_id: DbId,
    pub round_id: DbId,
    pub result: RoundResult,
    pub reflection: Option<String>,
    pub questions: Option<String>,
}

/// A drive as seen by one student.
#[derive(Debug, Clone, Serialize)]
pub struct DriveProgress {
    pub drive: Drive,
    pub rounds: Vec<Round>,
    pub participation: Option<Participation>,
    pub status: DriveStatus,
    /// Newest first.
    pub outcomes: Vec<RoundOutcome>,
    pub active_round_id: Option<DbId>,
}

/// Result of [`ParticipationTracker::verify`].
#[derive(Debug, Clone)]
pub enum VerificationOutcome {
    Verified(RoundOutcome),
    Rejected(RejectedOutcome),
}

/// The participation tracker.
///
/// Holds no participation or outcome state of its own; every read goes to
/// the store.
pub struct ParticipationTracker {
    store: Arc<dyn ParticipationStore>,
    events: Arc<EventBus>,
    policy: TrackerPolicy,
}

impl ParticipationTracker {
    pub fn new(
        store: Arc<dyn ParticipationStore>,
        events: Arc<EventBus>,
        policy: TrackerPolicy,
    ) -> Self {
        Self {
            store,
            events,
            policy,
        }
    }

    pub fn policy(&self) -> TrackerPolicy {
        self.policy
    }

    /// Record a student's outcome for one round of a drive.
    ///
    /// Everything is validated before the store is touched. The write itself
    /// is a single atomic unit: participation created if absent, outcome
    /// appended, and on FAIL the participation set to ELIMINATED.
    pub async fn record_outcome(
        &self,
        ctx: &StudentContext,
        submission: OutcomeSubmission,
    ) -> Result<RecordedOutcome, CoreError> {
        let reflection = normalize_text(submission.reflection);
        let questions = normalize_text(submission.questions);
        validate_submission(
            submission.result,
            reflection.as_deref(),
            questions.as_deref(),
        )?;

        let drive = self.require_drive(submission.drive_id).await?;
        ctx.ensure_batch(drive.batch_id)?;

        let round = self
            .store
            .find_round(submission.round_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Round",
                id: submission.round_id,
            })?;
        if round.drive_id != drive.id {
            return Err(CoreError::Validation(format!(
                "Round {} does not belong to drive {}",
                round.id, drive.id
            )));
        }

        let recorded = self
            .store
            .record_outcome(
                NewOutcome {
                    student_id: ctx.student_id,
                    drive_id: drive.id,
                    round_id: round.id,
                    result: submission.result,
                    reflection,
                    questions,
                },
                self.policy.duplicate_outcomes,
            )
            .await
            .map_err(|e| {
                tracing::warn!(
                    student_id = ctx.student_id,
                    drive_id = drive.id,
                    round_id = round.id,
                    error = %e,
                    "Failed to record round outcome",
                );
                CoreError::from(e)
            })?;

        tracing::info!(
            student_id = ctx.student_id,
            drive_id = drive.id,
            round_id = round.id,
            outcome_id = recorded.outcome.id,
            result = %submission.result,
            status = %recorded.participation.status,
            participation_created = recorded.participation_created,
            "Round outcome recorded",
        );

        Ok(recorded)
    }

    /// The round the student should report next, or `None` when they are
    /// eliminated, offered, or have reported every round.
    ///
    /// Recomputed from the store on every call.
    pub async fn derive_active_round(
        &self,
        student_id: DbId,
        drive_id: DbId,
    ) -> Result<Option<DbId>, CoreError> {
        self.require_drive(drive_id).await?;
        let rounds = self.store.list_rounds(drive_id).await?;
        let outcomes = self.store.list_outcomes(student_id, drive_id).await?;
        let participation = self.store.find_participation(student_id, drive_id).await?;
        active_round(&rounds, &outcomes, participation.as_ref())
    }

    /// Everything a student needs to render their progress in a drive.
    pub async fn drive_progress(
        &self,
        ctx: &StudentContext,
        drive_id: DbId,
    ) -> Result<DriveProgress, CoreError> {
        let drive = self.require_drive(drive_id).await?;
        ctx.ensure_batch(drive.batch_id)?;

        let rounds = self.store.list_rounds(drive_id).await?;
        let outcomes = self.store.list_outcomes(ctx.student_id, drive_id).await?;
        let participation = self
            .store
            .find_participation(ctx.student_id, drive_id)
            .await?;

        let active_round_id = active_round(&rounds, &outcomes, participation.as_ref())?;
        let status = DriveStatus::from(
            participation
                .as_ref()
                .map(Participation::parsed_status)
                .transpose()?,
        );

        Ok(DriveProgress {
            drive,
            rounds,
            participation,
            status,
            outcomes,
            active_round_id,
        })
    }

    /// Apply a verifier's decision to an outcome.
    ///
    /// VERIFY sets the verifier marker (overwriting any earlier one) and then
    /// publishes one `outcome-verified` event to the owning student. The
    /// event is published only after the store call has returned and cannot
    /// fail the operation. REJECT deletes the outcome; participation status
    /// follows the configured reject policy.
    pub async fn verify(
        &self,
        ctx: &VerifierContext,
        outcome_id: DbId,
        decision: VerificationDecision,
    ) -> Result<VerificationOutcome, CoreError> {
        ctx.ensure_can_verify()?;

        let outcome = self.require_outcome(outcome_id).await?;
        let owner = self
            .store
            .find_student(outcome.student_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Student",
                id: outcome.student_id,
            })?;
        ctx.ensure_batch(owner.batch_id)?;

        match decision {
            VerificationDecision::Verify => {
                let verified = self
                    .store
                    .mark_verified(outcome_id, ctx.actor_id)
                    .await?
                    .ok_or(CoreError::NotFound {
                        entity: "RoundOutcome",
                        id: outcome_id,
                    })?;

                tracing::info!(
                    outcome_id,
                    student_id = verified.student_id,
                    verifier_id = ctx.actor_id,
                    "Round outcome verified",
                );

                let receivers = self.events.publish(PlatformEvent::outcome_verified(
                    verified.student_id,
                    verified.id,
                    ctx.actor_id,
                ));
                if receivers == 0 {
                    tracing::warn!(
                        outcome_id,
                        student_id = verified.student_id,
                        "No notification subscribers; outcome-verified event dropped",
                    );
                }

                Ok(VerificationOutcome::Verified(verified))
            }
            VerificationDecision::Reject => {
                let rejected = self
                    .store
                    .reject_outcome(outcome_id, self.policy.on_reject)
                    .await?
                    .ok_or(CoreError::NotFound {
                        entity: "RoundOutcome",
                        id: outcome_id,
                    })?;

                tracing::info!(
                    outcome_id,
                    student_id = rejected.outcome.student_id,
                    verifier_id = ctx.actor_id,
                    status = rejected
                        .participation
                        .as_ref()
                        .map(|p| p.status.as_str())
                        .unwrap_or("OPEN"),
                    "Round outcome rejected",
                );

                Ok(VerificationOutcome::Rejected(rejected))
            }
        }
    }

    /// Record that a student received an offer in a drive.
    ///
    /// This is the only way a participation becomes OFFERED. The student
    /// must already be participating and must not be eliminated.
    pub async fn record_offer(
        &self,
        ctx: &VerifierContext,
        student_id: DbId,
        drive_id: DbId,
    ) -> Result<Participation, CoreError> {
        ctx.ensure_can_verify()?;

        let drive = self.require_drive(drive_id).await?;
        ctx.ensure_batch(drive.batch_id)?;
        let student = self
            .store
            .find_student(student_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Student",
                id: student_id,
            })?;
        ctx.ensure_batch(student.batch_id)?;

        let current = self
            .store
            .find_participation(student_id, drive_id)
            .await?
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Student {student_id} has not started drive {drive_id}"
                ))
            })?;
        validate_offer(current.parsed_status()?)?;

        // The status may have changed between the read and this write.
        let offered = self
            .store
            .promote_to_offered(student_id, drive_id)
            .await?
            .ok_or_else(|| {
                CoreError::Validation(
                    "Cannot record an offer for an eliminated participation".to_string(),
                )
            })?;

        tracing::info!(
            student_id,
            drive_id,
            verifier_id = ctx.actor_id,
            "Offer recorded",
        );

        Ok(offered)
    }

    /// Unverified outcomes in the verifier's batch, newest first.
    pub async fn pending_outcomes(
        &self,
        ctx: &VerifierContext,
    ) -> Result<Vec<PendingOutcome>, CoreError> {
        ctx.ensure_can_verify()?;
        Ok(self.store.list_pending(ctx.batch_id).await?)
    }

    async fn require_drive(&self, drive_id: DbId) -> Result<Drive, CoreError> {
        self.store
            .find_drive(drive_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Drive",
                id: drive_id,
            })
    }

    async fn require_outcome(&self, outcome_id: DbId) -> Result<RoundOutcome, CoreError> {
        self.store
            .find_outcome(outcome_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "RoundOutcome",
                id: outcome_id,
            })
    }
}

fn active_round(
    rounds: &[Round],
    outcomes: &[RoundOutcome],
    participation: Option<&Participation>,
) -> Result<Option<DbId>, CoreError> {
    let round_refs: Vec<_> = rounds.iter().map(Round::to_round_ref).collect();
    let outcome_refs = outcomes
        .iter()
        .map(RoundOutcome::to_outcome_ref)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CoreError::from(corrupt(e)))?;
    let status = participation
        .map(Participation::parsed_status)
        .transpose()
        .map_err(|e| CoreError::from(corrupt(e)))?;
    Ok(derive_active_round(&round_refs, &outcome_refs, status))
}

/// Trim free text; blank becomes `None`.
fn normalize_text(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}
