//! Book issue and return endpoints

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::issue::{CreateIssue, Issue, OpenIssue, ReturnIssue, ReturnReceipt},
    AppState,
};

use super::AuthenticatedAdmin;

/// List books currently out on loan
#[utoipa::path(
    get,
    path = "/issues",
    tag = "issues",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Open issues with current fines", body = Vec<OpenIssue>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_open_issues(
    State(state): State<AppState>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
) -> AppResult<Json<Vec<OpenIssue>>> {
    let issues = state.services.lending.list_open_issues().await?;
    Ok(Json(issues))
}

/// Issue a book to a student
#[utoipa::path(
    post,
    path = "/issues",
    tag = "issues",
    security(("bearer_auth" = [])),
    request_body = CreateIssue,
    responses(
        (status = 201, description = "Book issued", body = Issue),
        (status = 400, description = "Due date before issue date", body = crate::error::ErrorResponse),
        (status = 404, description = "Book or student not found", body = crate::error::ErrorResponse),
        (status = 409, description = "No copies available", body = crate::error::ErrorResponse),
        (status = 422, description = "Student is not active", body = crate::error::ErrorResponse)
    )
)]
pub async fn issue_book(
    State(state): State<AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
    Json(request): Json<CreateIssue>,
) -> AppResult<(StatusCode, Json<Issue>)> {
    let issue = state.services.lending.issue_book(request, &admin).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

/// Get an issue by ID
#[utoipa::path(
    get,
    path = "/issues/{id}",
    tag = "issues",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Issue ID")
    ),
    responses(
        (status = 200, description = "Issue details", body = Issue),
        (status = 404, description = "Issue not found")
    )
)]
pub async fn get_issue(
    State(state): State<AppState>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
    Path(id): Path<i32>,
) -> AppResult<Json<Issue>> {
    let issue = state.services.lending.get_issue(id).await?;
    Ok(Json(issue))
}

/// Return an issued book
///
/// The body is optional; an empty body returns the book today. A body that
/// is present must be a valid `ReturnIssue`.
#[utoipa::path(
    post,
    path = "/issues/{id}/return",
    tag = "issues",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Issue ID")
    ),
    request_body = ReturnIssue,
    responses(
        (status = 200, description = "Book returned", body = ReturnReceipt),
        (status = 400, description = "Malformed body, or return date outside issue date..today", body = crate::error::ErrorResponse),
        (status = 404, description = "Issue not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Already returned", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
    Path(id): Path<i32>,
    body: Bytes,
) -> AppResult<Json<ReturnReceipt>> {
    let request = parse_return_body(&body)?;
    let receipt = state.services.lending.return_book(id, request, &admin).await?;
    Ok(Json(receipt))
}

fn parse_return_body(body: &[u8]) -> AppResult<ReturnIssue> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ReturnIssue::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid return request: {}", e)))
}
