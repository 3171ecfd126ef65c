//! Repository for the `round_outcomes` table.

use placement_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::round_outcome::{
    CreateRoundOutcome, OutcomeInsight, PendingOutcome, RoundOutcome,
};

/// Column list for round_outcomes queries.
const COLUMNS: &str =
    "id, student_id, round_id, result, reflection, questions, verified_by, created_at";

/// Same columns qualified with the `o` alias for JOIN queries.
const PREFIXED_COLUMNS: &str = "o.id, o.student_id, o.round_id, o.result, o.reflection, \
    o.questions, o.verified_by, o.created_at";

/// Provides operations on submitted round outcomes.
pub struct RoundOutcomeRepo;

impl RoundOutcomeRepo {
    /// Insert a new, unverified outcome.
    pub async fn create<'e, E>(
        executor: E,
        input: &CreateRoundOutcome,
    ) -> Result<RoundOutcome, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO round_outcomes (student_id, round_id, result, reflection, questions)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RoundOutcome>(&query)
            .bind(input.student_id)
            .bind(input.round_id)
            .bind(&input.result)
            .bind(&input.reflection)
            .bind(&input.questions)
            .fetch_one(executor)
            .await
    }

    /// Find an outcome by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<RoundOutcome>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM round_outcomes WHERE id = $1");
        sqlx::query_as::<_, RoundOutcome>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether the student already has any outcome for this round.
    pub async fn exists_for_round<'e, E>(
        executor: E,
        student_id: DbId,
        round_id: DbId,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM round_outcomes WHERE student_id = $1 AND round_id = $2
             )",
        )
        .bind(student_id)
        .bind(round_id)
        .fetch_one(executor)
        .await
    }

    /// List a student's outcomes for every round of a drive, newest first.
    pub async fn list_for_student_drive<'e, E>(
        executor: E,
        student_id: DbId,
        drive_id: DbId,
    ) -> Result<Vec<RoundOutcome>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {PREFIXED_COLUMNS}
             FROM round_outcomes o
             JOIN rounds r ON r.id = o.round_id
             WHERE o.student_id = $1 AND r.drive_id = $2
             ORDER BY o.created_at DESC, o.id DESC"
        );
        sqlx::query_as::<_, RoundOutcome>(&query)
            .bind(student_id)
            .bind(drive_id)
            .fetch_all(executor)
            .await
    }

    /// Record the verifier on an outcome. Re-verifying overwrites the marker.
    ///
    /// Returns `None` if the outcome does not exist.
    pub async fn mark_verified(
        pool: &PgPool,
        id: DbId,
        verifier_id: DbId,
    ) -> Result<Option<RoundOutcome>, sqlx::Error> {
        let query = format!(
            "UPDATE round_outcomes SET verified_by = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RoundOutcome>(&query)
            .bind(id)
            .bind(verifier_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an outcome, returning the removed row if it existed.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<Option<RoundOutcome>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("DELETE FROM round_outcomes WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, RoundOutcome>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Unverified outcomes of students in a batch, newest first.
    pub async fn list_pending_for_batch(
        pool: &PgPool,
        batch_id: DbId,
    ) -> Result<Vec<PendingOutcome>, sqlx::Error> {
        sqlx::query_as::<_, PendingOutcome>(
            "SELECT
                o.id,
                o.student_id,
                s.name AS student_name,
                s.roll_no,
                o.round_id,
                r.name AS round_name,
                d.id AS drive_id,
                d.company_name,
                d.role,
                o.result,
                o.reflection,
                o.questions,
                o.created_at
             FROM round_outcomes o
             JOIN students s ON s.id = o.student_id
             JOIN rounds r ON r.id = o.round_id
             JOIN drives d ON d.id = r.drive_id
             WHERE o.verified_by IS NULL AND s.batch_id = $1
             ORDER BY o.created_at DESC, o.id DESC",
        )
        .bind(batch_id)
        .fetch_all(pool)
        .await
    }

    /// Verified outcomes carrying a reflection, optionally for one drive
    /// and/or a case-insensitive substring of the drive's role.
    pub async fn list_insights(
        pool: &PgPool,
        drive_id: Option<DbId>,
        role: Option<&str>,
        limit: i64,
    ) -> Result<Vec<OutcomeInsight>, sqlx::Error> {
        sqlx::query_as::<_, OutcomeInsight>(
            "SELECT
                o.id,
                d.id AS drive_id,
                d.company_name,
                d.role,
                d.package,
                r.name AS round_name,
                b.name AS batch_name,
                o.result,
                o.reflection,
                o.questions,
                o.created_at
             FROM round_outcomes o
             JOIN rounds r ON r.id = o.round_id
             JOIN drives d ON d.id = r.drive_id
             JOIN students s ON s.id = o.student_id
             JOIN batches b ON b.id = s.batch_id
             WHERE o.verified_by IS NOT NULL
               AND o.reflection IS NOT NULL
               AND ($1::BIGINT IS NULL OR d.id = $1)
               AND ($2::TEXT IS NULL OR strpos(lower(d.role), lower($2)) > 0)
             ORDER BY o.created_at DESC, o.id DESC
             LIMIT $3",
        )
        .bind(drive_id)
        .bind(role)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
