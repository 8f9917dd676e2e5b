//! PostgreSQL connection pooling and schema bootstrap

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::domain::DomainError;

/// PostgreSQL storage configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/admin_console".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }
}

/// Open a connection pool
pub async fn connect(config: &PostgresConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
}

const SCHEMA: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(100),
            email VARCHAR(320) NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role VARCHAR(20) NOT NULL DEFAULT 'member',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ
        )
        "#,
    ),
    (
        "teams",
        r#"
        CREATE TABLE IF NOT EXISTS teams (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "team_members",
        r#"
        CREATE TABLE IF NOT EXISTS team_members (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL UNIQUE REFERENCES users(id),
            team_id BIGINT NOT NULL REFERENCES teams(id),
            role VARCHAR(50) NOT NULL,
            joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "activity_logs",
        r#"
        CREATE TABLE IF NOT EXISTS activity_logs (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id),
            action TEXT NOT NULL,
            timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            ip_address VARCHAR(45)
        )
        "#,
    ),
    (
        "activity_logs_user_idx",
        "CREATE INDEX IF NOT EXISTS activity_logs_user_idx ON activity_logs (user_id, id DESC)",
    ),
];

/// Create the console tables if they do not exist yet
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DomainError> {
    for (name, statement) in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create {}: {}", name, e)))?;
    }

    Ok(())
}

/// Map a write failure, turning unique-constraint violations into `Conflict`
pub fn map_write_error(
    error: sqlx::Error,
    conflict_message: impl Into<String>,
    operation: &str,
) -> DomainError {
    let unique_violation = error
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());

    if unique_violation {
        DomainError::conflict(conflict_message)
    } else {
        DomainError::storage(format!("Failed to {}: {}", operation, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = PostgresConfig::new("postgres://db/console")
            .with_max_connections(4)
            .with_connect_timeout(5);

        assert_eq!(config.url, "postgres://db/console");
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.connect_timeout_secs, 5);
        assert_eq!(config.min_connections, 1);
    }

    #[test]
    fn test_schema_creates_tables_in_dependency_order() {
        let names: Vec<&str> = SCHEMA.iter().map(|(name, _)| *name).collect();
        let users = names.iter().position(|n| *n == "users").unwrap();
        let members = names.iter().position(|n| *n == "team_members").unwrap();
        let activity = names.iter().position(|n| *n == "activity_logs").unwrap();

        assert!(users < members);
        assert!(users < activity);
        assert!(SCHEMA.iter().all(|(_, sql)| sql.contains("IF NOT EXISTS")));
    }

    #[test]
    fn test_non_database_error_is_storage() {
        let error = map_write_error(sqlx::Error::RowNotFound, "dup", "insert row");
        assert!(matches!(error, DomainError::Storage { .. }));
        assert!(error.to_string().contains("insert row"));
    }
}
