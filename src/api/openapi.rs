//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{attendance, auth, books, health, issues, reports, students};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Administration API",
        version = "1.0.0",
        description = "Books, students, lending, attendance and reports for a school library"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Books
        books::list_books,
        books::list_available_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Students
        students::list_students,
        students::list_active_students,
        students::get_student,
        students::create_student,
        students::update_student,
        students::delete_student,
        students::get_student_issues,
        // Issues
        issues::list_open_issues,
        issues::issue_book,
        issues::get_issue,
        issues::return_book,
        // Attendance
        attendance::get_attendance_sheet,
        attendance::mark_attendance,
        attendance::get_attendance_summary,
        // Reports
        reports::dashboard,
        reports::overview,
        reports::books_report,
        reports::students_report,
        reports::attendance_report,
        reports::overdue_report,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::AdminInfo,
            // Books
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::BookQuery,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::api::BookPage,
            // Students
            crate::models::enums::StudentStatus,
            crate::models::student::Student,
            crate::models::student::StudentShort,
            crate::models::student::StudentQuery,
            crate::models::student::CreateStudent,
            crate::models::student::UpdateStudent,
            crate::api::StudentPage,
            // Issues
            crate::models::enums::IssueStatus,
            crate::models::issue::Issue,
            crate::models::issue::OpenIssue,
            crate::models::issue::StudentIssue,
            crate::models::issue::CreateIssue,
            crate::models::issue::ReturnIssue,
            crate::models::issue::ReturnReceipt,
            // Attendance
            crate::models::enums::AttendanceStatus,
            crate::models::attendance::AttendanceEntry,
            crate::models::attendance::MarkAttendance,
            crate::models::attendance::MarkAttendanceResult,
            crate::models::attendance::AttendanceSheetRow,
            crate::models::attendance::AttendanceSummary,
            // Reports
            crate::models::report::StatEntry,
            crate::models::report::RecentIssue,
            crate::models::report::Totals,
            crate::models::report::Dashboard,
            crate::models::report::Overview,
            crate::models::report::BookReportRow,
            crate::models::report::StudentReportRow,
            crate::models::report::AttendanceReportRow,
            crate::models::report::AttendanceReport,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Admin authentication"),
        (name = "books", description = "Book catalog"),
        (name = "students", description = "Student records"),
        (name = "issues", description = "Book issue and return"),
        (name = "attendance", description = "Daily attendance"),
        (name = "reports", description = "Reports")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
