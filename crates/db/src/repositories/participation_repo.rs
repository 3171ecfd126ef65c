//! Repository for the `participations` table.

use placement_core::participation::ParticipationStatus;
use placement_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::participation::Participation;

/// Column list for participations queries.
const COLUMNS: &str = "id, student_id, drive_id, status, created_at, updated_at";

/// Provides operations on (student, drive) participation rows.
pub struct ParticipationRepo;

impl ParticipationRepo {
    /// Create an IN_PROGRESS participation unless one already exists.
    ///
    /// This is a single conditional insert, so two concurrent first
    /// submissions cannot both create a row. Returns `true` when this call
    /// created the row.
    pub async fn insert_if_absent<'e, E>(
        executor: E,
        student_id: DbId,
        drive_id: DbId,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let inserted = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO participations (student_id, drive_id, status)
             VALUES ($1, $2, 'IN_PROGRESS')
             ON CONFLICT ON CONSTRAINT uq_participations_student_drive DO NOTHING
             RETURNING id",
        )
        .bind(student_id)
        .bind(drive_id)
        .fetch_optional(executor)
        .await?;
        Ok(inserted.is_some())
    }

    /// Find the participation for a (student, drive) pair.
    pub async fn find<'e, E>(
        executor: E,
        student_id: DbId,
        drive_id: DbId,
    ) -> Result<Option<Participation>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM participations
             WHERE student_id = $1 AND drive_id = $2"
        );
        sqlx::query_as::<_, Participation>(&query)
            .bind(student_id)
            .bind(drive_id)
            .fetch_optional(executor)
            .await
    }

    /// Same as [`find`](Self::find) but locks the row until the surrounding
    /// transaction ends. Serialises concurrent submissions for one drive.
    pub async fn find_for_update<'e, E>(
        executor: E,
        student_id: DbId,
        drive_id: DbId,
    ) -> Result<Option<Participation>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM participations
             WHERE student_id = $1 AND drive_id = $2
             FOR UPDATE"
        );
        sqlx::query_as::<_, Participation>(&query)
            .bind(student_id)
            .bind(drive_id)
            .fetch_optional(executor)
            .await
    }

    /// Overwrite the status of a participation row.
    pub async fn set_status<'e, E>(
        executor: E,
        id: DbId,
        status: ParticipationStatus,
    ) -> Result<Participation, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE participations SET status = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Participation>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(executor)
            .await
    }

    /// Mark a participation OFFERED unless it is ELIMINATED.
    ///
    /// Returns `None` if no row exists or the row is eliminated; the caller
    /// distinguishes the two with a follow-up [`find`](Self::find).
    pub async fn promote_to_offered(
        pool: &PgPool,
        student_id: DbId,
        drive_id: DbId,
    ) -> Result<Option<Participation>, sqlx::Error> {
        let query = format!(
            "UPDATE participations SET status = 'OFFERED'
             WHERE student_id = $1 AND drive_id = $2 AND status <> 'ELIMINATED'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Participation>(&query)
            .bind(student_id)
            .bind(drive_id)
            .fetch_optional(pool)
            .await
    }

    /// Count distinct students of a batch holding at least one offer.
    pub async fn count_placed_in_batch(pool: &PgPool, batch_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT p.student_id)
             FROM participations p
             JOIN drives d ON d.id = p.drive_id
             WHERE d.batch_id = $1 AND p.status = 'OFFERED'",
        )
        .bind(batch_id)
        .fetch_one(pool)
        .await
    }
}
