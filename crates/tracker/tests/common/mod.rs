//! Shared fixtures for tracker integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use placement_core::participation::RoundResult;
use placement_core::policy::TrackerPolicy;
use placement_core::roles::ROLE_CLASS_REP;
use placement_core::types::DbId;
use placement_events::EventBus;
use placement_tracker::{
    InMemoryStore, OutcomeSubmission, ParticipationTracker, StudentContext, VerifierContext,
};

pub const BATCH: DbId = 1;
pub const OTHER_BATCH: DbId = 2;

/// A tracker over an in-memory store seeded with one drive of three
/// rounds: Aptitude(1), Technical(2), HR(3).
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub events: Arc<EventBus>,
    pub tracker: ParticipationTracker,
    pub student: StudentContext,
    pub verifier: VerifierContext,
    pub drive_id: DbId,
    pub aptitude: DbId,
    pub technical: DbId,
    pub hr: DbId,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_policy(TrackerPolicy::default()).await
    }

    pub async fn with_policy(policy: TrackerPolicy) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let events = Arc::new(EventBus::default());

        let student = store.add_student(BATCH, "Asha", "CS001").await;
        let rep = store.add_student(BATCH, "Ravi", "CS002").await;
        let drive = store.add_drive(BATCH, "Acme", "SDE").await;
        // Inserted out of order; progression follows order_index.
        let hr = store.add_round(drive.id, "HR", 3).await.unwrap();
        let aptitude = store.add_round(drive.id, "Aptitude", 1).await.unwrap();
        let technical = store.add_round(drive.id, "Technical", 2).await.unwrap();

        let tracker = ParticipationTracker::new(store.clone(), events.clone(), policy);

        Self {
            store,
            events,
            tracker,
            student: StudentContext {
                student_id: student.id,
                batch_id: BATCH,
            },
            verifier: VerifierContext {
                actor_id: rep.id,
                role: ROLE_CLASS_REP.to_string(),
                batch_id: BATCH,
            },
            drive_id: drive.id,
            aptitude: aptitude.id,
            technical: technical.id,
            hr: hr.id,
        }
    }

    pub fn submission(&self, round_id: DbId, result: RoundResult) -> OutcomeSubmission {
        OutcomeSubmission {
            drive_id: self.drive_id,
            round_id,
            result,
            reflection: match result {
                RoundResult::Pass => None,
                RoundResult::Fail => Some("weak in DSA".to_string()),
            },
            questions: None,
        }
    }

    pub async fn pass(&self, round_id: DbId) -> DbId {
        self.tracker
            .record_outcome(&self.student, self.submission(round_id, RoundResult::Pass))
            .await
            .unwrap()
            .outcome
            .id
    }

    pub async fn fail(&self, round_id: DbId) -> DbId {
        self.tracker
            .record_outcome(&self.student, self.submission(round_id, RoundResult::Fail))
            .await
            .unwrap()
            .outcome
            .id
    }

    pub async fn active_round(&self) -> Option<DbId> {
        self.tracker
            .derive_active_round(self.student.student_id, self.drive_id)
            .await
            .unwrap()
    }

    pub async fn status(&self) -> Option<String> {
        use placement_tracker::ParticipationStore;
        self.store
            .find_participation(self.student.student_id, self.drive_id)
            .await
            .unwrap()
            .map(|p| p.status)
    }
}
