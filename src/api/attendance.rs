//! Attendance endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::attendance::{
        AttendanceQuery, AttendanceSheetRow, AttendanceSummary, MarkAttendance, MarkAttendanceResult,
    },
    AppState,
};

use super::AuthenticatedAdmin;

/// Attendance sheet for a day
#[utoipa::path(
    get,
    path = "/attendance",
    tag = "attendance",
    security(("bearer_auth" = [])),
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Active students with their mark for the day", body = Vec<AttendanceSheetRow>)
    )
)]
pub async fn get_attendance_sheet(
    State(state): State<AppState>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
    Query(query): Query<AttendanceQuery>,
) -> AppResult<Json<Vec<AttendanceSheetRow>>> {
    let sheet = state.services.attendance.sheet(query.date).await?;
    Ok(Json(sheet))
}

/// Mark attendance for every active student
#[utoipa::path(
    post,
    path = "/attendance",
    tag = "attendance",
    security(("bearer_auth" = [])),
    request_body = MarkAttendance,
    responses(
        (status = 200, description = "Attendance recorded", body = MarkAttendanceResult),
        (status = 400, description = "Future date or unknown student", body = crate::error::ErrorResponse)
    )
)]
pub async fn mark_attendance(
    State(state): State<AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
    Json(request): Json<MarkAttendance>,
) -> AppResult<Json<MarkAttendanceResult>> {
    let result = state.services.attendance.mark(request, &admin).await?;
    Ok(Json(result))
}

/// Present / absent / late counts for a day
#[utoipa::path(
    get,
    path = "/attendance/summary",
    tag = "attendance",
    security(("bearer_auth" = [])),
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Daily summary", body = AttendanceSummary)
    )
)]
pub async fn get_attendance_summary(
    State(state): State<AppState>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
    Query(query): Query<AttendanceQuery>,
) -> AppResult<Json<AttendanceSummary>> {
    let summary = state.services.attendance.summary(query.date).await?;
    Ok(Json(summary))
}
