//! Book issues repository for database operations

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::issue::{Issue, OpenIssueRow, StudentIssue},
};

const OPEN_ISSUES_SELECT: &str = r#"
    SELECT bi.id, bi.book_id, bi.student_id,
           b.title AS book_title, b.author,
           s.name AS student_name, s.roll_number, s.phone,
           bi.issue_date, bi.due_date
    FROM book_issues bi
    JOIN books b ON bi.book_id = b.id
    JOIN students s ON bi.student_id = s.id
    WHERE bi.status = 'issued'
"#;

#[derive(Clone)]
pub struct IssuesRepository {
    pool: Pool<Postgres>,
}

impl IssuesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get issue by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Issue> {
        sqlx::query_as::<_, Issue>("SELECT * FROM book_issues WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Issue with id {} not found", id)))
    }

    /// Open issues with book and student display fields, newest first
    pub async fn list_open(&self) -> AppResult<Vec<OpenIssueRow>> {
        let rows = sqlx::query_as::<_, OpenIssueRow>(&format!(
            "{} ORDER BY bi.issue_date DESC, bi.id DESC",
            OPEN_ISSUES_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Open issues whose due date is before `today`, oldest due date first
    pub async fn list_overdue(&self, today: NaiveDate, limit: Option<i64>) -> AppResult<Vec<OpenIssueRow>> {
        let rows = sqlx::query_as::<_, OpenIssueRow>(&format!(
            "{} AND bi.due_date < $1 ORDER BY bi.due_date ASC, bi.id ASC LIMIT $2",
            OPEN_ISSUES_SELECT
        ))
        .bind(today)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Full issue history of a student, newest first
    pub async fn list_for_student(&self, student_id: i32) -> AppResult<Vec<StudentIssue>> {
        let rows = sqlx::query_as::<_, StudentIssue>(
            r#"
            SELECT bi.id, bi.book_id, b.title AS book_title,
                   bi.issue_date, bi.due_date, bi.return_date,
                   bi.status, bi.fine_amount
            FROM book_issues bi
            JOIN books b ON bi.book_id = b.id
            WHERE bi.student_id = $1
            ORDER BY bi.issue_date DESC, bi.id DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert a new issue in state `issued`
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        book_id: i32,
        student_id: i32,
        issue_date: NaiveDate,
        due_date: NaiveDate,
        issued_by: i32,
    ) -> AppResult<Issue> {
        let issue = sqlx::query_as::<_, Issue>(
            r#"
            INSERT INTO book_issues (book_id, student_id, issue_date, due_date,
                                     status, fine_amount, issued_by)
            VALUES ($1, $2, $3, $4, 'issued', 0, $5)
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(student_id)
        .bind(issue_date)
        .bind(due_date)
        .bind(issued_by)
        .fetch_one(&mut *conn)
        .await?;
        Ok(issue)
    }

    /// Load an issue and hold a row lock on it until the transaction ends
    pub async fn lock_by_id(&self, conn: &mut PgConnection, id: i32) -> AppResult<Option<Issue>> {
        let issue = sqlx::query_as::<_, Issue>("SELECT * FROM book_issues WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(issue)
    }

    /// Close an open issue. Returns None when it was not in state `issued`.
    pub async fn mark_returned(
        &self,
        conn: &mut PgConnection,
        id: i32,
        return_date: NaiveDate,
        fine_amount: Decimal,
        returned_by: i32,
    ) -> AppResult<Option<Issue>> {
        let issue = sqlx::query_as::<_, Issue>(
            r#"
            UPDATE book_issues
            SET return_date = $2, status = 'returned', fine_amount = $3, returned_by = $4
            WHERE id = $1 AND status = 'issued'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(return_date)
        .bind(fine_amount)
        .bind(returned_by)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(issue)
    }

    /// Count open issues
    pub async fn count_open(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_issues WHERE status = 'issued'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count open issues due before `today`
    pub async fn count_overdue(&self, today: NaiveDate) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_issues WHERE status = 'issued' AND due_date < $1",
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
