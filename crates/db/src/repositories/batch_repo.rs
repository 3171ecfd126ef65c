//! Repository for the `batches` table.

use placement_core::types::DbId;
use sqlx::PgPool;

use crate::models::batch::{Batch, CreateBatch};

/// Column list for batches queries.
const COLUMNS: &str = "id, name, placement_rep_id, created_at, updated_at";

/// Provides CRUD operations for batches.
pub struct BatchRepo;

impl BatchRepo {
    /// Insert a new batch, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateBatch) -> Result<Batch, sqlx::Error> {
        let query = format!(
            "INSERT INTO batches (name, placement_rep_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Batch>(&query)
            .bind(&input.name)
            .bind(input.placement_rep_id)
            .fetch_one(pool)
            .await
    }

    /// Find a batch by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Batch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM batches WHERE id = $1");
        sqlx::query_as::<_, Batch>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All batches, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Batch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM batches ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Batch>(&query).fetch_all(pool).await
    }
}
