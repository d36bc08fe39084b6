//! Attendance repository

use chrono::NaiveDate;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        attendance::{AttendanceRecord, AttendanceSheetRow, AttendanceSummary},
        enums::AttendanceStatus,
    },
};

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: Pool<Postgres>,
}

impl AttendanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert or replace the record for (student, date)
    pub async fn upsert(
        &self,
        conn: &mut PgConnection,
        student_id: i32,
        date: NaiveDate,
        status: AttendanceStatus,
        remarks: Option<&str>,
        marked_by: i32,
    ) -> AppResult<AttendanceRecord> {
        let record = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            INSERT INTO attendance (student_id, attendance_date, status, remarks, marked_by)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (student_id, attendance_date) DO UPDATE
            SET status = EXCLUDED.status,
                remarks = EXCLUDED.remarks,
                marked_by = EXCLUDED.marked_by,
                marked_at = NOW()
            RETURNING *
            "#,
        )
        .bind(student_id)
        .bind(date)
        .bind(status)
        .bind(remarks)
        .bind(marked_by)
        .fetch_one(&mut *conn)
        .await?;
        Ok(record)
    }

    /// Active students with their record for `date`, by name
    pub async fn sheet(&self, date: NaiveDate) -> AppResult<Vec<AttendanceSheetRow>> {
        let rows = sqlx::query_as::<_, AttendanceSheetRow>(
            r#"
            SELECT s.id AS student_id, s.name, s.roll_number, s.department, s.year_of_study,
                   a.status, a.remarks
            FROM students s
            LEFT JOIN attendance a
                   ON s.id = a.student_id AND a.attendance_date = $1
            WHERE s.status = 'active'
            ORDER BY s.name
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Counts of each mark on `date`
    pub async fn summary(&self, date: NaiveDate) -> AppResult<AttendanceSummary> {
        let summary = sqlx::query_as::<_, AttendanceSummary>(
            r#"
            SELECT COUNT(*) FILTER (WHERE status = 'present') AS present,
                   COUNT(*) FILTER (WHERE status = 'absent') AS absent,
                   COUNT(*) FILTER (WHERE status = 'late') AS late,
                   COUNT(*) AS total
            FROM attendance
            WHERE attendance_date = $1
            "#,
        )
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(summary)
    }

    /// Number of records marked for `date`
    pub async fn count_on(&self, date: NaiveDate) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM attendance WHERE attendance_date = $1")
                .bind(date)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
