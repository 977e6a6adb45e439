//! Service health

use crate::repository::Repository;

#[derive(Clone)]
pub struct HealthService {
    repository: Repository,
}

impl HealthService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Whether the database answers; failures are logged, not returned
    pub async fn database_up(&self) -> bool {
        match self.repository.health.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                false
            }
        }
    }
}
