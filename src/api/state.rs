//! Application state for shared services

use std::sync::Arc;

use crate::domain::user::UserRepository;
use crate::infrastructure::auth::SessionManager;
use crate::infrastructure::services::{AccountService, TeamService};

/// Application state shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub account_service: Arc<AccountService>,
    pub team_service: Arc<TeamService>,
    pub sessions: Arc<SessionManager>,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(
        account_service: Arc<AccountService>,
        team_service: Arc<TeamService>,
        sessions: Arc<SessionManager>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            account_service,
            team_service,
            sessions,
            users,
        }
    }
}
