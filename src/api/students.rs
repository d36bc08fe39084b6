//! Student endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        issue::StudentIssue,
        student::{CreateStudent, Student, StudentQuery, StudentShort, UpdateStudent},
    },
    AppState,
};

use super::{AuthenticatedAdmin, PaginatedResponse};

/// List students with search and pagination
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    security(("bearer_auth" = [])),
    params(StudentQuery),
    responses(
        (status = 200, description = "Page of students", body = StudentPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_students(
    State(state): State<AppState>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
    Query(query): Query<StudentQuery>,
) -> AppResult<Json<PaginatedResponse<Student>>> {
    let (items, total) = state.services.catalog.search_students(&query).await?;

    Ok(Json(PaginatedResponse::new(
        items,
        total,
        query.page,
        query.per_page,
        state.services.catalog.page_size(),
    )))
}

/// Active students, for the issue form
#[utoipa::path(
    get,
    path = "/students/active",
    tag = "students",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Students allowed to borrow", body = Vec<StudentShort>)
    )
)]
pub async fn list_active_students(
    State(state): State<AppState>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
) -> AppResult<Json<Vec<StudentShort>>> {
    let students = state.services.lending.eligible_students().await?;
    Ok(Json(students))
}

/// Get a student by ID
#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(
    State(state): State<AppState>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
    Path(id): Path<i32>,
) -> AppResult<Json<Student>> {
    let student = state.services.catalog.get_student(id).await?;
    Ok(Json(student))
}

/// Register a student
#[utoipa::path(
    post,
    path = "/students",
    tag = "students",
    security(("bearer_auth" = [])),
    request_body = CreateStudent,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Roll number already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_student(
    State(state): State<AppState>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
    Json(student): Json<CreateStudent>,
) -> AppResult<(StatusCode, Json<Student>)> {
    let created = state.services.catalog.create_student(student).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a student
#[utoipa::path(
    put,
    path = "/students/{id}",
    tag = "students",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    request_body = UpdateStudent,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Roll number already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_student(
    State(state): State<AppState>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
    Path(id): Path<i32>,
    Json(student): Json<UpdateStudent>,
) -> AppResult<Json<Student>> {
    let updated = state.services.catalog.update_student(id, student).await?;
    Ok(Json(updated))
}

/// Delete a student
#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = "students",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Student has open or past issues", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_student(
    State(state): State<AppState>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_student(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Issue history of a student
#[utoipa::path(
    get,
    path = "/students/{id}/issues",
    tag = "students",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Issues of the student, newest first", body = Vec<StudentIssue>),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student_issues(
    State(state): State<AppState>,
    AuthenticatedAdmin(_admin): AuthenticatedAdmin,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<StudentIssue>>> {
    let issues = state.services.lending.list_student_issues(id).await?;
    Ok(Json(issues))
}
