//! Batch model.

use placement_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `batches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Batch {
    pub id: DbId,
    pub name: String,
    pub placement_rep_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a batch.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBatch {
    pub name: String,
    pub placement_rep_id: Option<DbId>,
}
