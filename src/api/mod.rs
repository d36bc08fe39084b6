//! API handlers for the library administration REST endpoints

pub mod attendance;
pub mod auth;
pub mod books;
pub mod health;
pub mod issues;
pub mod openapi;
pub mod reports;
pub mod students;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::{admin::AdminClaims, AdminContext, Book, Student},
    repository::page_window,
    AppState,
};

/// Extractor for the authenticated admin from a JWT bearer token
pub struct AuthenticatedAdmin(pub AdminContext);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = AdminClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedAdmin(claims.context()))
    }
}

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
#[aliases(BookPage = PaginatedResponse<Book>, StudentPage = PaginatedResponse<Student>)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Rows of the requested page
    pub items: Vec<T>,
    /// Total number of matching rows
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Rows per page
    pub per_page: i64,
}

impl<T> PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Wrap a page of rows, echoing the window the repository actually used
    pub fn new(items: Vec<T>, total: i64, page: Option<i64>, per_page: Option<i64>, default_per_page: i64) -> Self {
        let (limit, offset) = page_window(page, per_page, default_per_page);
        Self {
            items,
            total,
            page: offset / limit + 1,
            per_page: limit,
        }
    }
}

/// Build the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/available", get(books::list_available_books))
        .route(
            "/books/:id",
            get(books::get_book).put(books::update_book).delete(books::delete_book),
        )
        // Students
        .route("/students", get(students::list_students).post(students::create_student))
        .route("/students/active", get(students::list_active_students))
        .route(
            "/students/:id",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .route("/students/:id/issues", get(students::get_student_issues))
        // Issues
        .route("/issues", get(issues::list_open_issues).post(issues::issue_book))
        .route("/issues/:id", get(issues::get_issue))
        .route("/issues/:id/return", post(issues::return_book))
        // Attendance
        .route(
            "/attendance",
            get(attendance::get_attendance_sheet).post(attendance::mark_attendance),
        )
        .route("/attendance/summary", get(attendance::get_attendance_summary))
        // Reports
        .route("/reports/dashboard", get(reports::dashboard))
        .route("/reports/overview", get(reports::overview))
        .route("/reports/books", get(reports::books_report))
        .route("/reports/students", get(reports::students_report))
        .route("/reports/attendance", get(reports::attendance_report))
        .route("/reports/overdue", get(reports::overdue_report))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
