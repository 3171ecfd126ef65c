//! The participation tracker.
//!
//! Records round outcomes, derives each student's active round and applies
//! verification decisions. Persistence goes through [`ParticipationStore`],
//! with a PostgreSQL backend ([`PgParticipationStore`]) for the server and an
//! in-memory backend ([`InMemoryStore`]) for tests and local tooling.

pub mod context;
pub mod error;
pub mod memory;
pub mod pg;
pub mod store;
pub mod tracker;

pub use context::{StudentContext, VerifierContext};
pub use error::StoreError;
pub use memory::InMemoryStore;
pub use pg::PgParticipationStore;
pub use store::{NewOutcome, ParticipationStore, RecordedOutcome, RejectedOutcome};
pub use tracker::{DriveProgress, OutcomeSubmission, ParticipationTracker, VerificationOutcome};
