//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Read-only methods take `&PgPool`; methods that also run inside a
//! transaction accept any [`sqlx::PgExecutor`] so callers can pass either
//! the pool or `&mut *tx`.

pub mod batch_repo;
pub mod drive_repo;
pub mod participation_repo;
pub mod round_outcome_repo;
pub mod round_repo;
pub mod student_repo;

pub use batch_repo::BatchRepo;
pub use drive_repo::DriveRepo;
pub use participation_repo::ParticipationRepo;
pub use round_outcome_repo::RoundOutcomeRepo;
pub use round_repo::RoundRepo;
pub use student_repo::StudentRepo;
