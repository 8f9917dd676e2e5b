//! PostgreSQL activity log repository

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::activity::{ActivityLogEntry, ActivityLogRepository, ActivityType, NewActivity};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of ActivityLogRepository
#[derive(Debug, Clone)]
pub struct PostgresActivityLogRepository {
    pool: PgPool,
}

impl PostgresActivityLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLogRepository for PostgresActivityLogRepository {
    async fn append(&self, activity: NewActivity) -> Result<ActivityLogEntry, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO activity_logs (user_id, action, ip_address)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, action, timestamp, ip_address
            "#,
        )
        .bind(activity.user_id.value())
        .bind(activity.action.as_str())
        .bind(activity.ip_address.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to append activity: {}", e)))?;

        row_to_entry(&row)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<ActivityLogEntry>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, action, timestamp, ip_address
            FROM activity_logs
            WHERE user_id = $1
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.value())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list activity: {}", e)))?;

        rows.iter().map(row_to_entry).collect()
    }
}

fn row_to_entry(row: &sqlx::postgres::PgRow) -> Result<ActivityLogEntry, DomainError> {
    let action: String = row.get("action");
    let action = action
        .parse::<ActivityType>()
        .map_err(|e| DomainError::storage(format!("Invalid activity in database: {}", e)))?;

    Ok(ActivityLogEntry {
        id: row.get("id"),
        user_id: UserId::new(row.get("user_id")),
        action,
        timestamp: row.get("timestamp"),
        ip_address: row.get("ip_address"),
    })
}
