//! Runtime selection of the repository backend

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use crate::config::{StorageBackend, StorageSettings};
use crate::domain::activity::ActivityLogRepository;
use crate::domain::team::TeamRepository;
use crate::domain::user::UserRepository;
use crate::domain::DomainError;
use crate::infrastructure::activity::{InMemoryActivityLogRepository, PostgresActivityLogRepository};
use crate::infrastructure::team::{InMemoryTeamRepository, PostgresTeamRepository};
use crate::infrastructure::user::{InMemoryUserRepository, PostgresUserRepository};

use super::postgres::{connect, ensure_schema, PostgresConfig};

/// The repositories every service draws from
#[derive(Debug, Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub activity: Arc<dyn ActivityLogRepository>,
    pub teams: Arc<dyn TeamRepository>,
}

impl Repositories {
    /// Fresh, empty in-memory repositories
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            activity: Arc::new(InMemoryActivityLogRepository::new()),
            teams: Arc::new(InMemoryTeamRepository::new()),
        }
    }

    /// PostgreSQL repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            activity: Arc::new(PostgresActivityLogRepository::new(pool.clone())),
            teams: Arc::new(PostgresTeamRepository::new(pool)),
        }
    }
}

/// Factory for building repositories from configuration
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(settings: &StorageSettings) -> Result<Repositories, DomainError> {
        match settings.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage");
                Ok(Repositories::in_memory())
            }
            StorageBackend::Postgres => {
                let config = postgres_config(settings)?;
                let pool = connect(&config).await?;
                ensure_schema(&pool).await?;

                info!(max_connections = config.max_connections, "Using PostgreSQL storage");
                Ok(Repositories::postgres(pool))
            }
        }
    }
}

fn postgres_config(settings: &StorageSettings) -> Result<PostgresConfig, DomainError> {
    let url = settings.database_url.as_deref().ok_or_else(|| {
        DomainError::configuration("storage.database_url (or DATABASE_URL) is required for postgres")
    })?;

    Ok(PostgresConfig::new(url).with_max_connections(settings.max_connections))
}
