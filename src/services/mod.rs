//! Business logic services

pub mod attendance;
pub mod auth;
pub mod catalog;
pub mod lending;
pub mod reports;

use std::sync::Arc;

use crate::{clock::Clock, config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub attendance: attendance::AttendanceService,
    pub lending: lending::LendingService,
    pub reports: reports::ReportsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        let policy = lending::FinePolicy::from(&config.lending);
        let lending = lending::LendingService::new(repository.clone(), policy, clock.clone());

        Self {
            auth: auth::AuthService::new(repository.clone(), config.auth.clone()),
            catalog: catalog::CatalogService::new(repository.clone(), config.catalog.page_size),
            attendance: attendance::AttendanceService::new(repository.clone(), clock.clone()),
            reports: reports::ReportsService::new(repository, lending.clone(), clock),
            lending,
        }
    }
}
