//! Repository for the `rounds` table.

use placement_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::round::{CreateRound, Round};

/// Column list for rounds queries.
const COLUMNS: &str = "id, drive_id, name, order_index, created_at, updated_at";

/// Provides CRUD operations for rounds.
pub struct RoundRepo;

impl RoundRepo {
    /// Insert a new round.
    ///
    /// A duplicate `order_index` within the drive violates
    /// `uq_rounds_drive_order`.
    pub async fn create(pool: &PgPool, input: &CreateRound) -> Result<Round, sqlx::Error> {
        let query = format!(
            "INSERT INTO rounds (drive_id, name, order_index)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Round>(&query)
            .bind(input.drive_id)
            .bind(&input.name)
            .bind(input.order_index)
            .fetch_one(pool)
            .await
    }

    /// Find a round by its ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Round>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM rounds WHERE id = $1");
        sqlx::query_as::<_, Round>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List the rounds of a drive in progression order.
    pub async fn list_for_drive(pool: &PgPool, drive_id: DbId) -> Result<Vec<Round>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rounds
             WHERE drive_id = $1
             ORDER BY order_index ASC"
        );
        sqlx::query_as::<_, Round>(&query)
            .bind(drive_id)
            .fetch_all(pool)
            .await
    }
}
