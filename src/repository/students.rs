//! Students repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use super::contains_pattern;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::StudentStatus,
        student::{CreateStudent, Student, StudentShort, UpdateStudent},
    },
};

#[derive(Clone)]
pub struct StudentsRepository {
    pool: Pool<Postgres>,
}

impl StudentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get student by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Student> {
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student with id {} not found", id)))
    }

    /// Search students. A search term matches across all statuses; without
    /// one the list is restricted to `status`.
    pub async fn search(
        &self,
        search: Option<&str>,
        status: StudentStatus,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Student>, i64)> {
        let pattern = search
            .filter(|s| !s.trim().is_empty())
            .map(contains_pattern);

        let filter = r#"
            (($1::text IS NULL AND status = $2)
             OR ($1::text IS NOT NULL
                 AND (name ILIKE $1 OR roll_number ILIKE $1
                      OR email ILIKE $1 OR department ILIKE $1)))
        "#;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM students WHERE {}", filter))
                .bind(&pattern)
                .bind(status)
                .fetch_one(&self.pool)
                .await?;

        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT * FROM students WHERE {} ORDER BY id DESC LIMIT $3 OFFSET $4",
            filter
        ))
        .bind(&pattern)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((students, total))
    }

    /// Active students for the issue form
    pub async fn list_active(&self) -> AppResult<Vec<StudentShort>> {
        let students = sqlx::query_as::<_, StudentShort>(
            "SELECT id, name, roll_number FROM students WHERE status = 'active' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    /// IDs of active students, locked against concurrent status changes
    pub async fn active_ids(&self, conn: &mut PgConnection) -> AppResult<Vec<i32>> {
        let ids = sqlx::query_scalar::<_, i32>(
            "SELECT id FROM students WHERE status = 'active' ORDER BY id FOR SHARE",
        )
        .fetch_all(&mut *conn)
        .await?;
        Ok(ids)
    }

    /// Create a student (always active)
    pub async fn create(&self, data: &CreateStudent) -> AppResult<Student> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (name, roll_number, email, phone, department,
                                  year_of_study, address, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'active')
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.roll_number)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.department)
        .bind(data.year_of_study)
        .bind(&data.address)
        .fetch_one(&self.pool)
        .await?;
        Ok(student)
    }

    /// Update a student
    pub async fn update(&self, id: i32, data: &UpdateStudent) -> AppResult<Student> {
        sqlx::query_as::<_, Student>(
            r#"
            UPDATE students SET
                name = COALESCE($2, name),
                roll_number = COALESCE($3, roll_number),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                department = COALESCE($6, department),
                year_of_study = COALESCE($7, year_of_study),
                address = COALESCE($8, address),
                status = COALESCE($9, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.roll_number)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.department)
        .bind(data.year_of_study)
        .bind(&data.address)
        .bind(data.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student with id {} not found", id)))
    }

    /// Delete a student with no issue history; attendance goes with it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i32> =
            sqlx::query_scalar("SELECT id FROM students WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(AppError::NotFound(format!("Student with id {} not found", id)));
        }

        let (open, total): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FILTER (WHERE status = 'issued'), COUNT(*)
            FROM book_issues
            WHERE student_id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if open > 0 {
            return Err(AppError::ConstraintViolation(format!(
                "Student {} has {} open issue(s)",
                id, open
            )));
        }
        if total > 0 {
            return Err(AppError::ConstraintViolation(format!(
                "Student {} has issue history and cannot be deleted",
                id
            )));
        }

        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Read a student's status and hold a share lock on the row until the
    /// surrounding transaction ends
    pub async fn lock_status(
        &self,
        conn: &mut PgConnection,
        id: i32,
    ) -> AppResult<Option<StudentStatus>> {
        let status = sqlx::query_scalar::<_, StudentStatus>(
            "SELECT status FROM students WHERE id = $1 FOR SHARE",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(status)
    }
}
