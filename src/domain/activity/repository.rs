//! Activity log repository trait

use async_trait::async_trait;

use super::entity::{ActivityLogEntry, NewActivity};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Append-only store for activity log entries
#[async_trait]
pub trait ActivityLogRepository: Send + Sync + std::fmt::Debug {
    /// Append an entry, stamping the current time
    async fn append(&self, activity: NewActivity) -> Result<ActivityLogEntry, DomainError>;

    /// Most recent entries for a user, newest first
    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<ActivityLogEntry>, DomainError>;
}
