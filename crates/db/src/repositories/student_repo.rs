//! Repository for the `students` table.

use placement_core::types::DbId;
use sqlx::PgPool;

use crate::models::student::{CreateStudent, Student};

/// Column list for students queries.
const COLUMNS: &str =
    "id, batch_id, name, roll_no, email, is_class_rep, created_at, updated_at";

/// Provides CRUD operations for students.
pub struct StudentRepo;

impl StudentRepo {
    /// Insert a new student, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateStudent) -> Result<Student, sqlx::Error> {
        let query = format!(
            "INSERT INTO students (batch_id, name, roll_no, email, is_class_rep)
             VALUES ($1, $2, $3, $4, COALESCE($5, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(input.batch_id)
            .bind(&input.name)
            .bind(&input.roll_no)
            .bind(&input.email)
            .bind(input.is_class_rep)
            .fetch_one(pool)
            .await
    }

    /// Find a student by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Student>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE id = $1");
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Students of a batch ordered by roll number.
    pub async fn list_for_batch(pool: &PgPool, batch_id: DbId) -> Result<Vec<Student>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE batch_id = $1 ORDER BY roll_no, id");
        sqlx::query_as::<_, Student>(&query)
            .bind(batch_id)
            .fetch_all(pool)
            .await
    }

    /// Grant or revoke the class-representative flag.
    ///
    /// Returns `None` if no student has this ID.
    pub async fn set_class_rep(
        pool: &PgPool,
        id: DbId,
        is_class_rep: bool,
    ) -> Result<Option<Student>, sqlx::Error> {
        let query = format!(
            "UPDATE students SET is_class_rep = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .bind(is_class_rep)
            .fetch_optional(pool)
            .await
    }

    /// Count the students enrolled in a batch.
    pub async fn count_for_batch(pool: &PgPool, batch_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students WHERE batch_id = $1")
            .bind(batch_id)
            .fetch_one(pool)
            .await
    }
}
