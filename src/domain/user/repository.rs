//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by ID, including soft-deleted ones
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Find an active user by exact email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Insert a user; fails with `Conflict` when the email is already taken
    async fn insert(&self, user: NewUser) -> Result<User, DomainError>;

    /// Replace the password hash of a user
    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), DomainError>;

    /// Update name and email; fails with `Conflict` when the email is taken
    async fn update_account(&self, id: UserId, name: &str, email: &str)
    -> Result<User, DomainError>;

    /// Soft-delete a user, stamping `deleted_at` and mangling the email
    async fn soft_delete(&self, id: UserId) -> Result<User, DomainError>;

    /// Count users that are not soft-deleted
    async fn count_active(&self) -> Result<usize, DomainError>;

    /// Check if an active user holds this email
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
