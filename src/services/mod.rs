//! Business logic services

pub mod borrowings;
pub mod catalog;
pub mod health;
pub mod payments;
pub mod users;

use crate::{config::LibraryConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub borrowings: borrowings::BorrowingsService,
    pub health: health::HealthService,
    pub payments: payments::PaymentsService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, library_config: &LibraryConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            borrowings: borrowings::BorrowingsService::new(
                repository.clone(),
                library_config.fine_multiplier,
            ),
            health: health::HealthService::new(repository.clone()),
            payments: payments::PaymentsService::new(repository.clone()),
            users: users::UsersService::new(repository),
        }
    }
}
