//! Repository layer for database operations

pub mod admins;
pub mod attendance;
pub mod books;
pub mod issues;
pub mod students;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub admins: admins::AdminsRepository,
    pub books: books::BooksRepository,
    pub students: students::StudentsRepository,
    pub attendance: attendance::AttendanceRepository,
    pub issues: issues::IssuesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            admins: admins::AdminsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            students: students::StudentsRepository::new(pool.clone()),
            attendance: attendance::AttendanceRepository::new(pool.clone()),
            issues: issues::IssuesRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Build an `ILIKE` pattern matching `term` anywhere, with wildcards in the
/// term itself escaped.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.trim().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Resolve 1-based page / page size into (limit, offset)
pub(crate) fn page_window(page: Option<i64>, per_page: Option<i64>, default_per_page: i64) -> (i64, i64) {
    let per_page = per_page.unwrap_or(default_per_page).clamp(1, 100);
    let page = page.unwrap_or(1).max(1);
    (per_page, (page - 1) * per_page)
}
