//! Read-only report rows

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::IssueStatus;
use super::issue::OpenIssue;

/// Label / count pair for grouped counts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StatEntry {
    pub label: String,
    pub value: i64,
}

/// Issue row for "recent activity" lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RecentIssue {
    pub id: i32,
    pub book_title: String,
    pub student_name: String,
    pub roll_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: IssueStatus,
}

/// Headline counters
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Totals {
    pub total_books: i64,
    pub available_copies: i64,
    pub active_students: i64,
    pub issued_books: i64,
    pub overdue_books: i64,
}

/// Dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Dashboard {
    pub totals: Totals,
    /// Attendance records marked today
    pub attendance_today: i64,
    pub recent_issues: Vec<RecentIssue>,
    pub overdue: Vec<OpenIssue>,
}

/// Overview report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Overview {
    pub totals: Totals,
    pub books_by_category: Vec<StatEntry>,
    pub students_by_department: Vec<StatEntry>,
    pub recent_issues: Vec<RecentIssue>,
}

/// Circulation of a single book
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookReportRow {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub category: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
    pub total_issues: i64,
    pub current_issues: i64,
}

/// Borrowing and attendance of a single active student
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentReportRow {
    pub id: i32,
    pub name: String,
    pub roll_number: String,
    pub department: Option<String>,
    pub total_books_issued: i64,
    pub current_books: i64,
    pub present_days: i64,
    pub absent_days: i64,
    #[schema(value_type = String)]
    pub fines_paid: Decimal,
}

/// Attendance counts for a student over a date range
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceReportRow {
    pub student_id: i32,
    pub name: String,
    pub roll_number: String,
    pub department: Option<String>,
    pub present_count: i64,
    pub absent_count: i64,
    pub late_count: i64,
    pub marked_days: i64,
}

/// Attendance report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rows: Vec<AttendanceReportRow>,
}

/// Date range query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    /// Defaults to the first day of the current month
    pub start_date: Option<NaiveDate>,
    /// Defaults to today
    pub end_date: Option<NaiveDate>,
}
