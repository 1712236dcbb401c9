use std::sync::Arc;

use async_trait::async_trait;

use crate::application::admin::AdminDestinationService;
use crate::application::auth::AuthService;
use crate::application::blog::BlogService;
use crate::application::destinations::DestinationService;
use crate::application::seeding::PopulationService;
use crate::infra::db::PostgresRepositories;

/// Backing-store liveness check behind `/health`.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self) -> Result<(), String>;
}

#[async_trait]
impl HealthProbe for PostgresRepositories {
    async fn check(&self) -> Result<(), String> {
        self.health_check().await.map_err(|err| err.to_string())
    }
}

#[derive(Clone)]
pub struct HttpState {
    pub destinations: Arc<DestinationService>,
    pub blog: Arc<BlogService>,
    pub admin: Arc<AdminDestinationService>,
    pub auth: Arc<AuthService>,
    pub population: Arc<PopulationService>,
    pub health: Arc<dyn HealthProbe>,
}
