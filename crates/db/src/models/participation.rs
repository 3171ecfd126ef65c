//! Participation model.

use placement_core::error::CoreError;
use placement_core::participation::ParticipationStatus;
use placement_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `participations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Participation {
    pub id: DbId,
    pub student_id: DbId,
    pub drive_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Participation {
    /// Parse the stored status column.
    pub fn parsed_status(&self) -> Result<ParticipationStatus, CoreError> {
        self.status.parse()
    }
}
