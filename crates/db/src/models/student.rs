//! Student model.

use placement_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `students` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Student {
    pub id: DbId,
    pub batch_id: DbId,
    pub name: String,
    pub roll_no: String,
    pub email: String,
    pub is_class_rep: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a student.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudent {
    pub batch_id: DbId,
    pub name: String,
    pub roll_no: String,
    pub email: String,
    pub is_class_rep: Option<bool>,
}
