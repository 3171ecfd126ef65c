//! In-memory [`ParticipationStore`] used by tests and local tooling.
//!
//! Each multi-row write runs against a clone of the state and swaps it in
//! only on success, so a failed write leaves nothing behind.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use placement_core::participation::{recompute_status, ParticipationStatus, RoundResult};
use placement_core::policy::{DuplicateOutcomePolicy, RejectPolicy};
use placement_core::types::DbId;
use placement_db::models::drive::Drive;
use placement_db::models::participation::Participation;
use placement_db::models::round::Round;
use placement_db::models::round_outcome::{PendingOutcome, RoundOutcome};
use placement_db::models::student::Student;
use tokio::sync::Mutex;

use crate::error::{corrupt, StoreError};
use crate::store::{NewOutcome, ParticipationStore, RecordedOutcome, RejectedOutcome};

#[derive(Debug, Clone, Default)]
struct State {
    next_id: DbId,
    students: BTreeMap<DbId, Student>,
    drives: BTreeMap<DbId, Drive>,
    rounds: BTreeMap<DbId, Round>,
    participations: BTreeMap<DbId, Participation>,
    outcomes: BTreeMap<DbId, RoundOutcome>,
}

impl State {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn participation_id(&self, student_id: DbId, drive_id: DbId) -> Option<DbId> {
        self.participations
            .values()
            .find(|p| p.student_id == student_id && p.drive_id == drive_id)
            .map(|p| p.id)
    }

    fn outcomes_for(&self, student_id: DbId, drive_id: DbId) -> Vec<RoundOutcome> {
        let mut outcomes: Vec<RoundOutcome> = self
            .outcomes
            .values()
            .filter(|o| {
                o.student_id == student_id
                    && self
                        .rounds
                        .get(&o.round_id)
                        .is_some_and(|r| r.drive_id == drive_id)
            })
            .cloned()
            .collect();
        outcomes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        outcomes
    }
}

/// A process-local store. Seed it with [`add_student`](Self::add_student),
/// [`add_drive`](Self::add_drive) and [`add_round`](Self::add_round).
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    fail_outcome_inserts: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_student(&self, batch_id: DbId, name: &str, roll_no: &str) -> Student {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        let now = Utc::now();
        let student = Student {
            id,
            batch_id,
            name: name.to_string(),
            roll_no: roll_no.to_string(),
            email: format!("{}@example.edu", roll_no.to_lowercase()),
            is_class_rep: false,
            created_at: now,
            updated_at: now,
        };
        state.students.insert(id, student.clone());
        student
    }

    pub async fn add_drive(&self, batch_id: DbId, company_name: &str, role: &str) -> Drive {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        let now = Utc::now();
        let drive = Drive {
            id,
            batch_id,
            company_name: company_name.to_string(),
            role: role.to_string(),
            package: String::new(),
            drive_date: None,
            created_at: now,
            updated_at: now,
        };
        state.drives.insert(id, drive.clone());
        drive
    }

    /// Add a round. A second round with the same `order_index` in the drive
    /// fails with [`StoreError::Duplicate`].
    pub async fn add_round(
        &self,
        drive_id: DbId,
        name: &str,
        order_index: i32,
    ) -> Result<Round, StoreError> {
        let mut state = self.state.lock().await;
        if !state.drives.contains_key(&drive_id) {
            return Err(StoreError::NotFound {
                entity: "Drive",
                id: drive_id,
            });
        }
        if state
            .rounds
            .values()
            .any(|r| r.drive_id == drive_id && r.order_index == order_index)
        {
            return Err(StoreError::Duplicate(format!(
                "Round order {order_index} already exists in drive {drive_id}"
            )));
        }
        let id = state.allocate_id();
        let now = Utc::now();
        let round = Round {
            id,
            drive_id,
            name: name.to_string(),
            order_index,
            created_at: now,
            updated_at: now,
        };
        state.rounds.insert(id, round.clone());
        Ok(round)
    }

    /// Make every subsequent outcome insert fail with a backend error, after
    /// the participation step has run. Used to check that a failed
    /// submission leaves no partial state.
    pub fn fail_outcome_inserts(&self, fail: bool) {
        self.fail_outcome_inserts.store(fail, Ordering::SeqCst);
    }

    /// Number of participation rows, across all students and drives.
    pub async fn participation_count(&self) -> usize {
        self.state.lock().await.participations.len()
    }
}

#[async_trait]
impl ParticipationStore for InMemoryStore {
    async fn find_student(&self, id: DbId) -> Result<Option<Student>, StoreError> {
        Ok(self.state.lock().await.students.get(&id).cloned())
    }

    async fn find_drive(&self, id: DbId) -> Result<Option<Drive>, StoreError> {
        Ok(self.state.lock().await.drives.get(&id).cloned())
    }

    async fn find_round(&self, id: DbId) -> Result<Option<Round>, StoreError> {
        Ok(self.state.lock().await.rounds.get(&id).cloned())
    }

    async fn list_rounds(&self, drive_id: DbId) -> Result<Vec<Round>, StoreError> {
        let state = self.state.lock().await;
        let mut rounds: Vec<Round> = state
            .rounds
            .values()
            .filter(|r| r.drive_id == drive_id)
            .cloned()
            .collect();
        rounds.sort_by_key(|r| r.order_index);
        Ok(rounds)
    }

    async fn find_participation(
        &self,
        student_id: DbId,
        drive_id: DbId,
    ) -> Result<Option<Participation>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .participation_id(student_id, drive_id)
            .and_then(|id| state.participations.get(&id).cloned()))
    }

    async fn list_outcomes(
        &self,
        student_id: DbId,
        drive_id: DbId,
    ) -> Result<Vec<RoundOutcome>, StoreError> {
        Ok(self.state.lock().await.outcomes_for(student_id, drive_id))
    }

    async fn find_outcome(&self, id: DbId) -> Result<Option<RoundOutcome>, StoreError> {
        Ok(self.state.lock().await.outcomes.get(&id).cloned())
    }

    async fn record_outcome(
        &self,
        outcome: NewOutcome,
        duplicates: DuplicateOutcomePolicy,
    ) -> Result<RecordedOutcome, StoreError> {
        let mut guard = self.state.lock().await;
        let mut tx = guard.clone();
        let now = Utc::now();

        let (participation_id, participation_created) =
            match tx.participation_id(outcome.student_id, outcome.drive_id) {
                Some(id) => (id, false),
                None => {
                    let id = tx.allocate_id();
                    tx.participations.insert(
                        id,
                        Participation {
                            id,
                            student_id: outcome.student_id,
                            drive_id: outcome.drive_id,
                            status: ParticipationStatus::InProgress.as_str().to_string(),
                            created_at: now,
                            updated_at: now,
                        },
                    );
                    (id, true)
                }
            };

        if duplicates == DuplicateOutcomePolicy::Reject
            && tx
                .outcomes
                .values()
                .any(|o| o.student_id == outcome.student_id && o.round_id == outcome.round_id)
        {
            return Err(StoreError::Duplicate(format!(
                "An outcome for round {} has already been recorded",
                outcome.round_id
            )));
        }

        if self.fail_outcome_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("simulated insert failure".to_string()));
        }

        let id = tx.allocate_id();
        let created = RoundOutcome {
            id,
            student_id: outcome.student_id,
            round_id: outcome.round_id,
            result: outcome.result.as_str().to_string(),
            reflection: outcome.reflection,
            questions: outcome.questions,
            verified_by: None,
            created_at: now,
        };
        tx.outcomes.insert(id, created.clone());

        let participation = tx
            .participations
            .get_mut(&participation_id)
            .ok_or(StoreError::NotFound {
                entity: "Participation",
                id: participation_id,
            })?;
        if outcome.result == RoundResult::Fail {
            participation.status = ParticipationStatus::Eliminated.as_str().to_string();
            participation.updated_at = now;
        }
        let participation = participation.clone();

        *guard = tx;

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
        let mut state = self.state.lock().await;
        Ok(state.outcomes.get_mut(&outcome_id).map(|o| {
            o.verified_by = Some(verifier_id);
            o.clone()
        }))
    }

    async fn reject_outcome(
        &self,
        outcome_id: DbId,
        policy: RejectPolicy,
    ) -> Result<Option<RejectedOutcome>, StoreError> {
        let mut guard = self.state.lock().await;
        let mut tx = guard.clone();

        let Some(outcome) = tx.outcomes.remove(&outcome_id) else {
            return Ok(None);
        };
        let drive_id = tx
            .rounds
            .get(&outcome.round_id)
            .map(|r| r.drive_id)
            .ok_or(StoreError::NotFound {
                entity: "Round",
                id: outcome.round_id,
            })?;

        let remaining = tx
            .outcomes_for(outcome.student_id, drive_id)
            .iter()
            .map(RoundOutcome::to_outcome_ref)
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)?;

        let participation = match tx.participation_id(outcome.student_id, drive_id) {
            Some(id) => {
                let row = tx.participations.get_mut(&id).ok_or(StoreError::NotFound {
                    entity: "Participation",
                    id,
                })?;
                if policy == RejectPolicy::Recompute {
                    let status = row.parsed_status().map_err(corrupt)?;
                    let next = recompute_status(status, &remaining);
                    if next != status {
                        row.status = next.as_str().to_string();
                        row.updated_at = Utc::now();
                    }
                }
                Some(row.clone())
            }
            None => None,
        };

        *guard = tx;

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
        let mut state = self.state.lock().await;
        let Some(id) = state.participation_id(student_id, drive_id) else {
            return Ok(None);
        };
        let Some(row) = state.participations.get_mut(&id) else {
            return Ok(None);
        };
        if row.status == ParticipationStatus::Eliminated.as_str() {
            return Ok(None);
        }
        row.status = ParticipationStatus::Offered.as_str().to_string();
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn list_pending(&self, batch_id: DbId) -> Result<Vec<PendingOutcome>, StoreError> {
        let state = self.state.lock().await;
        let mut pending: Vec<PendingOutcome> = state
            .outcomes
            .values()
            .filter(|o| o.verified_by.is_none())
            .filter_map(|o| {
                let student = state.students.get(&o.student_id)?;
                if student.batch_id != batch_id {
                    return None;
                }
                let round = state.rounds.get(&o.round_id)?;
                let drive = state.drives.get(&round.drive_id)?;
                Some(PendingOutcome {
                    id: o.id,
                    student_id: student.id,
                    student_name: student.name.clone(),
                    roll_no: student.roll_no.clone(),
                    round_id: round.id,
                    round_name: round.name.clone(),
                    drive_id: drive.id,
                    company_name: drive.company_name.clone(),
                    role: drive.role.clone(),
                    result: o.result.clone(),
                    reflection: o.reflection.clone(),
                    questions: o.questions.clone(),
                    created_at: o.created_at,
                })
            })
            .collect();
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(pending)
    }
}
