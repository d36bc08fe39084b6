//! Shared fixtures for database-backed tests
//!
//! Tests connect to the PostgreSQL database named by `DATABASE_URL`, run the
//! migrations and create their own uniquely named rows, so they can run in
//! parallel against a database that already holds data.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use library_admin_server::{
    clock::FixedClock,
    config::AppConfig,
    models::{
        book::{Book, CreateBook},
        student::{CreateStudent, Student, UpdateStudent},
        AdminContext, StudentStatus,
    },
    repository::Repository,
    services::auth::hash_password,
    AppState,
};

pub const TEST_PASSWORD: &str = "integration-secret";

static SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Per-process unique suffix for names that must not collide between runs
pub fn unique(prefix: &str) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}-{}-{}", prefix, nanos, SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub struct TestApp {
    pub pool: PgPool,
    pub state: AppState,
    pub admin: AdminContext,
}

pub async fn connect() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Wire the application against the test database with "today" pinned
pub async fn spawn_app(today: NaiveDate) -> TestApp {
    spawn_app_with(today, |_| {}).await
}

/// Like `spawn_app`, with a hook to adjust the configuration first
pub async fn spawn_app_with(today: NaiveDate, configure: impl FnOnce(&mut AppConfig)) -> TestApp {
    let pool = connect().await;

    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    configure(&mut config);

    let state = AppState::new(config, pool.clone(), Arc::new(FixedClock::new(today)));

    let username = unique("admin");
    let hash = hash_password(TEST_PASSWORD).unwrap();
    let admin = Repository::new(pool.clone())
        .admins
        .create(&username, &hash, "Test Librarian")
        .await
        .expect("Failed to create test admin");

    TestApp {
        pool,
        state,
        admin: AdminContext {
            admin_id: admin.id,
            username: admin.username,
        },
    }
}

impl TestApp {
    pub async fn add_book(&self, copies: i32) -> Book {
        self.state
            .services
            .catalog
            .create_book(CreateBook {
                title: unique("Book"),
                author: "Test Author".to_string(),
                isbn: None,
                category: Some("Testing".to_string()),
                publisher: None,
                publication_year: Some(2020),
                total_copies: copies,
            })
            .await
            .expect("Failed to create book")
    }

    pub async fn add_student(&self) -> Student {
        self.state
            .services
            .catalog
            .create_student(CreateStudent {
                name: unique("Student"),
                roll_number: unique("R"),
                email: None,
                phone: Some("555-0100".to_string()),
                department: Some("Testing".to_string()),
                year_of_study: Some(1),
                address: None,
            })
            .await
            .expect("Failed to create student")
    }

    pub async fn deactivate(&self, student_id: i32) {
        self.state
            .services
            .catalog
            .update_student(
                student_id,
                UpdateStudent {
                    status: Some(StudentStatus::Inactive),
                    ..UpdateStudent::default()
                },
            )
            .await
            .expect("Failed to deactivate student");
    }

    pub async fn available_copies(&self, book_id: i32) -> i32 {
        self.state
            .services
            .catalog
            .get_book(book_id)
            .await
            .expect("Book should exist")
            .available_copies
    }
}
