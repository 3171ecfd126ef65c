//! Drive model and dashboard projections.

use placement_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `drives` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Drive {
    pub id: DbId,
    pub batch_id: DbId,
    pub company_name: String,
    pub role: String,
    pub package: String,
    pub drive_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a drive.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDrive {
    pub batch_id: DbId,
    pub company_name: String,
    pub role: String,
    pub package: Option<String>,
    pub drive_date: Option<Timestamp>,
}

/// A drive as listed for one student, with that student's participation
/// status (`None` when no participation exists yet).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StudentDriveRow {
    pub id: DbId,
    pub company_name: String,
    pub role: String,
    pub package: String,
    pub drive_date: Option<Timestamp>,
    pub round_count: i64,
    pub participation_status: Option<String>,
}

/// Number of OFFERED participations for one drive.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DriveOfferCount {
    pub drive_id: DbId,
    pub company_name: String,
    pub role: String,
    pub package: String,
    pub offers: i64,
}
