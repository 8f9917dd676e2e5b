//! In-memory user repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug)]
struct State {
    users: BTreeMap<UserId, User>,
    next_id: i64,
}

/// In-memory implementation of UserRepository
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State {
                users: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn email_taken(users: &BTreeMap<UserId, User>, email: &str, except: Option<UserId>) -> bool {
    users
        .values()
        .any(|u| u.email() == email && Some(u.id()) != except)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;

        Ok(state
            .users
            .values()
            .find(|u| u.is_active() && u.email() == email)
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, DomainError> {
        let mut state = self.state.write().await;

        if email_taken(&state.users, &user.email, None) {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                user.email
            )));
        }

        let id = UserId::new(state.next_id);
        state.next_id += 1;

        let user = User::from_new(id, user, Utc::now());
        state.users.insert(id, user.clone());

        Ok(user)
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), DomainError> {
        let mut state = self.state.write().await;

        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        user.set_password_hash(password_hash);
        Ok(())
    }

    async fn update_account(
        &self,
        id: UserId,
        name: &str,
        email: &str,
    ) -> Result<User, DomainError> {
        let mut state = self.state.write().await;

        if email_taken(&state.users, email, Some(id)) {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                email
            )));
        }

        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        user.set_profile(name, email);
        Ok(user.clone())
    }

    async fn soft_delete(&self, id: UserId) -> Result<User, DomainError> {
        let mut state = self.state.write().await;

        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        user.soft_delete(Utc::now());
        Ok(user.clone())
    }

    async fn count_active(&self) -> Result<usize, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.values().filter(|u| u.is_active()).count())
    }
}
