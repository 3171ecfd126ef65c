//! Repository for the `drives` table.

use placement_core::types::DbId;
use sqlx::PgPool;

use crate::models::drive::{CreateDrive, Drive, DriveOfferCount, StudentDriveRow};

/// Column list for drives queries.
const COLUMNS: &str =
    "id, batch_id, company_name, role, package, drive_date, created_at, updated_at";

/// Provides CRUD and dashboard queries for drives.
pub struct DriveRepo;

impl DriveRepo {
    /// Insert a new drive, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateDrive) -> Result<Drive, sqlx::Error> {
        let query = format!(
            "INSERT INTO drives (batch_id, company_name, role, package, drive_date)
             VALUES ($1, $2, $3, COALESCE($4, ''), $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Drive>(&query)
            .bind(input.batch_id)
            .bind(&input.company_name)
            .bind(&input.role)
            .bind(&input.package)
            .bind(input.drive_date)
            .fetch_one(pool)
            .await
    }

    /// Find a drive by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Drive>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drives WHERE id = $1");
        sqlx::query_as::<_, Drive>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the drives of a batch, most recent drive date first.
    pub async fn list_for_batch(pool: &PgPool, batch_id: DbId) -> Result<Vec<Drive>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM drives
             WHERE batch_id = $1
             ORDER BY drive_date DESC NULLS LAST, id DESC"
        );
        sqlx::query_as::<_, Drive>(&query)
            .bind(batch_id)
            .fetch_all(pool)
            .await
    }

    /// List the drives of a batch together with one student's participation
    /// status. Drives the student has not started have a `NULL` status.
    pub async fn list_for_student(
        pool: &PgPool,
        batch_id: DbId,
        student_id: DbId,
    ) -> Result<Vec<StudentDriveRow>, sqlx::Error> {
        sqlx::query_as::<_, StudentDriveRow>(
            "SELECT
                d.id,
                d.company_name,
                d.role,
                d.package,
                d.drive_date,
                (SELECT COUNT(*) FROM rounds r WHERE r.drive_id = d.id) AS round_count,
                p.status AS participation_status
             FROM drives d
             LEFT JOIN participations p
                ON p.drive_id = d.id AND p.student_id = $2
             WHERE d.batch_id = $1
             ORDER BY d.drive_date DESC NULLS LAST, d.id DESC",
        )
        .bind(batch_id)
        .bind(student_id)
        .fetch_all(pool)
        .await
    }

    /// Count OFFERED participations per drive of a batch. Drives without
    /// offers are omitted.
    pub async fn offer_counts_for_batch(
        pool: &PgPool,
        batch_id: DbId,
    ) -> Result<Vec<DriveOfferCount>, sqlx::Error> {
        sqlx::query_as::<_, DriveOfferCount>(
            "SELECT
                d.id AS drive_id,
                d.company_name,
                d.role,
                d.package,
                COUNT(p.id) AS offers
             FROM drives d
             JOIN participations p
                ON p.drive_id = d.id AND p.status = 'OFFERED'
             WHERE d.batch_id = $1
             GROUP BY d.id
             ORDER BY offers DESC, d.id ASC",
        )
        .bind(batch_id)
        .fetch_all(pool)
        .await
    }
}
