//! Daily attendance service

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
    models::{
        admin::AdminContext,
        attendance::{
            AttendanceEntry, AttendanceSheetRow, AttendanceSummary, MarkAttendance,
            MarkAttendanceResult,
        },
        enums::AttendanceStatus,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AttendanceService {
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl AttendanceService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Mark every active student for a date in one transaction. Students
    /// without an entry are recorded absent.
    pub async fn mark(&self, request: MarkAttendance, admin: &AdminContext) -> AppResult<MarkAttendanceResult> {
        let date = request.attendance_date;
        if date > self.clock.today() {
            return Err(AppError::Validation(format!(
                "Cannot mark attendance for future date {}",
                date
            )));
        }

        let mut tx = self.repository.pool.begin().await?;

        let active = self.repository.students.active_ids(&mut tx).await?;
        let entries = index_entries(request.entries, &active)?;

        let mut marked = 0u64;
        for student_id in active {
            let (status, remarks) = match entries.get(&student_id) {
                Some(entry) => (entry.status, entry.remarks.as_deref()),
                None => (AttendanceStatus::Absent, None),
            };
            self.repository
                .attendance
                .upsert(&mut tx, student_id, date, status, remarks, admin.admin_id)
                .await?;
            marked += 1;
        }

        tx.commit().await?;

        tracing::info!(date = %date, marked, admin = %admin.username, "Attendance marked");

        Ok(MarkAttendanceResult {
            attendance_date: date,
            marked,
        })
    }

    /// Active students with their mark for a date (default today)
    pub async fn sheet(&self, date: Option<NaiveDate>) -> AppResult<Vec<AttendanceSheetRow>> {
        let date = date.unwrap_or_else(|| self.clock.today());
        self.repository.attendance.sheet(date).await
    }

    /// Present / absent / late counts for a date (default today)
    pub async fn summary(&self, date: Option<NaiveDate>) -> AppResult<AttendanceSummary> {
        let date = date.unwrap_or_else(|| self.clock.today());
        self.repository.attendance.summary(date).await
    }
}

/// Index entries by student, rejecting duplicates and students that are not
/// active
fn index_entries(
    entries: Vec<AttendanceEntry>,
    active: &[i32],
) -> AppResult<HashMap<i32, AttendanceEntry>> {
    let mut indexed = HashMap::with_capacity(entries.len());
    for entry in entries {
        if !active.contains(&entry.student_id) {
            return Err(AppError::Validation(format!(
                "Student {} is not an active student",
                entry.student_id
            )));
        }
        let student_id = entry.student_id;
        if indexed.insert(student_id, entry).is_some() {
            return Err(AppError::Validation(format!(
                "Student {} appears more than once",
                student_id
            )));
        }
    }
    Ok(indexed)
}
