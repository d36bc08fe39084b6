//! Read-only reports over books, students, issues and attendance

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
    models::report::{
        AttendanceReport, AttendanceReportRow, BookReportRow, Dashboard, Overview, RecentIssue,
        StatEntry, StudentReportRow, Totals,
    },
    models::OpenIssue,
    repository::Repository,
    services::lending::LendingService,
};

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
    lending: LendingService,
    clock: Arc<dyn Clock>,
}

impl ReportsService {
    pub fn new(repository: Repository, lending: LendingService, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            lending,
            clock,
        }
    }

    async fn totals(&self) -> AppResult<Totals> {
        let pool = &self.repository.pool;
        let today = self.clock.today();

        let (total_books, available_copies): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(available_copies), 0)::bigint FROM books",
        )
        .fetch_one(pool)
        .await?;

        let active_students: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE status = 'active'")
                .fetch_one(pool)
                .await?;

        Ok(Totals {
            total_books,
            available_copies,
            active_students,
            issued_books: self.repository.issues.count_open().await?,
            overdue_books: self.repository.issues.count_overdue(today).await?,
        })
    }

    async fn recent_issues(&self, limit: i64) -> AppResult<Vec<RecentIssue>> {
        let rows = sqlx::query_as::<_, RecentIssue>(
            r#"
            SELECT bi.id, b.title AS book_title, s.name AS student_name, s.roll_number,
                   bi.issue_date, bi.due_date, bi.status
            FROM book_issues bi
            JOIN books b ON bi.book_id = b.id
            JOIN students s ON bi.student_id = s.id
            ORDER BY bi.issue_date DESC, bi.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.repository.pool)
        .await?;
        Ok(rows)
    }

    /// Dashboard counters and short lists
    pub async fn dashboard(&self) -> AppResult<Dashboard> {
        Ok(Dashboard {
            totals: self.totals().await?,
            attendance_today: self.repository.attendance.count_on(self.clock.today()).await?,
            recent_issues: self.recent_issues(5).await?,
            overdue: self.lending.list_overdue(Some(5)).await?,
        })
    }

    /// Overview with category and department breakdowns
    pub async fn overview(&self) -> AppResult<Overview> {
        let pool = &self.repository.pool;

        let books_by_category = sqlx::query_as::<_, StatEntry>(
            r#"
            SELECT COALESCE(NULLIF(category, ''), 'Uncategorized') AS label, COUNT(*) AS value
            FROM books
            GROUP BY 1
            ORDER BY value DESC, label
            "#,
        )
        .fetch_all(pool)
        .await?;

        let students_by_department = sqlx::query_as::<_, StatEntry>(
            r#"
            SELECT COALESCE(NULLIF(department, ''), 'Unassigned') AS label, COUNT(*) AS value
            FROM students
            WHERE status = 'active'
            GROUP BY 1
            ORDER BY value DESC, label
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(Overview {
            totals: self.totals().await?,
            books_by_category,
            students_by_department,
            recent_issues: self.recent_issues(10).await?,
        })
    }

    /// Circulation per book, most issued first
    pub async fn books(&self) -> AppResult<Vec<BookReportRow>> {
        let rows = sqlx::query_as::<_, BookReportRow>(
            r#"
            SELECT b.id, b.title, b.author, b.category, b.total_copies, b.available_copies,
                   COUNT(bi.id) AS total_issues,
                   COUNT(bi.id) FILTER (WHERE bi.status = 'issued') AS current_issues
            FROM books b
            LEFT JOIN book_issues bi ON bi.book_id = b.id
            GROUP BY b.id
            ORDER BY total_issues DESC, b.title
            "#,
        )
        .fetch_all(&self.repository.pool)
        .await?;
        Ok(rows)
    }

    /// Borrowing and attendance per active student
    pub async fn students(&self) -> AppResult<Vec<StudentReportRow>> {
        let rows = sqlx::query_as::<_, StudentReportRow>(
            r#"
            SELECT s.id, s.name, s.roll_number, s.department,
                   COALESCE(i.total, 0) AS total_books_issued,
                   COALESCE(i.current, 0) AS current_books,
                   COALESCE(i.fines, 0) AS fines_paid,
                   COALESCE(a.present, 0) AS present_days,
                   COALESCE(a.absent, 0) AS absent_days
            FROM students s
            LEFT JOIN (
                SELECT student_id,
                       COUNT(*) AS total,
                       COUNT(*) FILTER (WHERE status = 'issued') AS current,
                       SUM(fine_amount) AS fines
                FROM book_issues
                GROUP BY student_id
            ) i ON i.student_id = s.id
            LEFT JOIN (
                SELECT student_id,
                       COUNT(*) FILTER (WHERE status = 'present') AS present,
                       COUNT(*) FILTER (WHERE status = 'absent') AS absent
                FROM attendance
                GROUP BY student_id
            ) a ON a.student_id = s.id
            WHERE s.status = 'active'
            ORDER BY s.name
            "#,
        )
        .fetch_all(&self.repository.pool)
        .await?;
        Ok(rows)
    }

    /// Attendance counts per active student over a date range
    pub async fn attendance(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> AppResult<AttendanceReport> {
        let today = self.clock.today();
        let (start_date, end_date) = resolve_range(start_date, end_date, today)?;

        let rows = sqlx::query_as::<_, AttendanceReportRow>(
            r#"
            SELECT s.id AS student_id, s.name, s.roll_number, s.department,
                   COUNT(a.id) FILTER (WHERE a.status = 'present') AS present_count,
                   COUNT(a.id) FILTER (WHERE a.status = 'absent') AS absent_count,
                   COUNT(a.id) FILTER (WHERE a.status = 'late') AS late_count,
                   COUNT(a.id) AS marked_days
            FROM students s
            LEFT JOIN attendance a
                   ON s.id = a.student_id
                  AND a.attendance_date BETWEEN $1 AND $2
            WHERE s.status = 'active'
            GROUP BY s.id, s.name, s.roll_number, s.department
            ORDER BY s.name
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.repository.pool)
        .await?;

        Ok(AttendanceReport {
            start_date,
            end_date,
            rows,
        })
    }

    /// Every overdue open issue, most overdue first
    pub async fn overdue(&self) -> AppResult<Vec<OpenIssue>> {
        self.lending.list_overdue(None).await
    }
}

/// Fill in a report date range: first of the month through today
fn resolve_range(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> AppResult<(NaiveDate, NaiveDate)> {
    let start = start_date.unwrap_or_else(|| today.with_day(1).unwrap_or(today));
    let end = end_date.unwrap_or(today);
    if start > end {
        return Err(AppError::Validation(format!(
            "Start date {} is after end date {}",
            start, end
        )));
    }
    Ok((start, end))
}
