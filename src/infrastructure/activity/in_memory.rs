//! In-memory activity log

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::activity::{ActivityLogEntry, ActivityLogRepository, NewActivity};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of ActivityLogRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryActivityLogRepository {
    entries: Arc<RwLock<Vec<ActivityLogEntry>>>,
}

impl InMemoryActivityLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry in insertion order
    pub async fn all(&self) -> Vec<ActivityLogEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl ActivityLogRepository for InMemoryActivityLogRepository {
    async fn append(&self, activity: NewActivity) -> Result<ActivityLogEntry, DomainError> {
        let mut entries = self.entries.write().await;

        let entry = ActivityLogEntry {
            id: entries.len() as i64 + 1,
            user_id: activity.user_id,
            action: activity.action,
            timestamp: Utc::now(),
            ip_address: activity.ip_address,
        };
        entries.push(entry.clone());

        Ok(entry)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<ActivityLogEntry>, DomainError> {
        let entries = self.entries.read().await;

        Ok(entries
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }
}
