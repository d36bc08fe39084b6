//! Library administration server
//!
//! REST JSON API for a school library: book catalog, student records,
//! book issue and return with overdue fines, daily attendance and reports.

use std::sync::Arc;

use sqlx::PgPool;

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub pool: PgPool,
}

impl AppState {
    /// Wire repositories and services over a connection pool
    pub fn new(config: AppConfig, pool: PgPool, clock: Arc<dyn clock::Clock>) -> Self {
        let repository = repository::Repository::new(pool.clone());
        let services = services::Services::new(repository, &config, clock);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
            pool,
        }
    }
}
