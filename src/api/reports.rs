//! Report endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        issue::OpenIssue,
        report::{AttendanceReport, BookReportRow, Dashboard, DateRangeQuery, Overview, StudentReportRow},
    },
    AppState,
};

use super::AuthenticatedAdmin;

/// Dashboard counters
#[utoipa::path(
    get,
    path = "/reports/dashboard",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard", body = Dashboard)
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
) -> AppResult<Json<Dashboard>> {
    Ok(Json(state.services.reports.dashboard().await?))
}

/// Library overview
#[utoipa::path(
    get,
    path = "/reports/overview",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Overview", body = Overview)
    )
)]
pub async fn overview(
    State(state): State<AppState>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
) -> AppResult<Json<Overview>> {
    Ok(Json(state.services.reports.overview().await?))
}

/// Circulation per book
#[utoipa::path(
    get,
    path = "/reports/books",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Books report", body = Vec<BookReportRow>)
    )
)]
pub async fn books_report(
    State(state): State<AppState>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
) -> AppResult<Json<Vec<BookReportRow>>> {
    Ok(Json(state.services.reports.books().await?))
}

/// Borrowing and attendance per student
#[utoipa::path(
    get,
    path = "/reports/students",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Students report", body = Vec<StudentReportRow>)
    )
)]
pub async fn students_report(
    State(state): State<AppState>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
) -> AppResult<Json<Vec<StudentReportRow>>> {
    Ok(Json(state.services.reports.students().await?))
}

/// Attendance over a date range
#[utoipa::path(
    get,
    path = "/reports/attendance",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Attendance report", body = AttendanceReport),
        (status = 400, description = "Start date after end date", body = crate::error::ErrorResponse)
    )
)]
pub async fn attendance_report(
    State(state): State<AppState>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<AttendanceReport>> {
    let report = state
        .services
        .reports
        .attendance(query.start_date, query.end_date)
        .await?;
    Ok(Json(report))
}

/// Overdue books with current fines
#[utoipa::path(
    get,
    path = "/reports/overdue",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Overdue issues, most overdue first", body = Vec<OpenIssue>)
    )
)]
pub async fn overdue_report(
    State(state): State<AppState>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
) -> AppResult<Json<Vec<OpenIssue>>> {
    Ok(Json(state.services.reports.overdue().await?))
}
