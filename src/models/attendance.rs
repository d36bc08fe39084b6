//! Attendance model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::AttendanceStatus;

/// Attendance record, one per student per date
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: i32,
    pub student_id: i32,
    pub attendance_date: NaiveDate,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
    pub marked_by: Option<i32>,
    pub marked_at: DateTime<Utc>,
}

/// One student's mark in a bulk submission
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AttendanceEntry {
    pub student_id: i32,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

/// Mark attendance for a date. Active students without an entry are marked absent.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MarkAttendance {
    pub attendance_date: NaiveDate,
    #[serde(default)]
    pub entries: Vec<AttendanceEntry>,
}

/// Result of a bulk mark
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MarkAttendanceResult {
    pub attendance_date: NaiveDate,
    pub marked: u64,
}

/// Active student with their mark for a date, if any
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceSheetRow {
    pub student_id: i32,
    pub name: String,
    pub roll_number: String,
    pub department: Option<String>,
    pub year_of_study: Option<i32>,
    pub status: Option<AttendanceStatus>,
    pub remarks: Option<String>,
}

/// Counts of marks on a date
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceSummary {
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub total: i64,
}

/// Attendance query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Date (YYYY-MM-DD), defaults to today
    pub date: Option<NaiveDate>,
}
