//! Admin Console
//!
//! Account, session and team administration service:
//! - Password sign-in/sign-up with signed session cookies
//! - Password change, profile update and soft account deletion
//! - Personal teams with owner-managed membership
//! - Per-user activity log

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use rand::Rng;
use tracing::info;

use api::state::AppState;
use domain::team::{NewTeamMember, Team, TeamRole};
use domain::user::{NewUser, User, UserRole};
use infrastructure::{
    auth::{Argon2Hasher, PasswordHasher, SessionConfig, SessionManager},
    services::{AccountService, TeamService},
    storage::{Repositories, StorageFactory},
};

/// Environment variable holding the bootstrap administrator's password
pub const ADMIN_PASSWORD_ENV: &str = "ADMIN_DEFAULT_PASSWORD";

/// Create application state with the given configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let repos = StorageFactory::create(&config.storage).await?;
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());
    let sessions = Arc::new(create_session_manager(config)?);

    if let Some(email) = config.auth.bootstrap_admin_email() {
        let password = std::env::var(ADMIN_PASSWORD_ENV).ok();
        create_initial_admin_user(&repos, hasher.as_ref(), email, password).await?;
    }

    Ok(build_state(repos, hasher, sessions))
}

/// Wire services over an already-built set of repositories
pub fn build_state(
    repos: Repositories,
    hasher: Arc<dyn PasswordHasher>,
    sessions: Arc<SessionManager>,
) -> AppState {
    let account_service = Arc::new(AccountService::new(
        repos.users.clone(),
        repos.activity.clone(),
        repos.teams.clone(),
        hasher,
        sessions.clone(),
    ));
    let team_service = Arc::new(TeamService::new(
        repos.users.clone(),
        repos.teams.clone(),
        repos.activity,
    ));

    AppState::new(account_service, team_service, sessions, repos.users)
}

fn create_session_manager(config: &AppConfig) -> anyhow::Result<SessionManager> {
    let secret = config.auth.secret.clone().unwrap_or_else(|| {
        tracing::warn!(
            "No auth.secret or AUTH_SECRET configured. Generating random secret. \
            Sessions will NOT persist across restarts."
        );
        generate_random_secret()
    });

    let session_config = SessionConfig::new(secret, config.auth.session_ttl_hours)?
        .with_cookie_name(config.auth.cookie_name.clone())
        .with_secure_cookie(config.auth.secure_cookie);

    Ok(SessionManager::new(session_config))
}

fn random_alphanumeric(len: usize) -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a random session signing secret
fn generate_random_secret() -> String {
    random_alphanumeric(64)
}

/// Create the administrator account when no active users exist
///
/// Returns the created user, or `None` when the store already has users.
pub async fn create_initial_admin_user(
    repos: &Repositories,
    hasher: &dyn PasswordHasher,
    email: &str,
    password: Option<String>,
) -> anyhow::Result<Option<User>> {
    if repos.users.count_active().await? > 0 {
        return Ok(None);
    }

    let (password, from_env) = match password {
        Some(p) if !p.is_empty() => (p, true),
        _ => (random_alphanumeric(16), false),
    };

    let password_hash = hasher.hash(&password)?;
    let user = repos
        .users
        .insert(NewUser::new(email, password_hash, UserRole::Admin).with_name("Administrator"))
        .await?;

    let team = repos.teams.create_team(&Team::personal_name(user.email())).await?;
    repos
        .teams
        .add_member(NewTeamMember::new(team.id, user.id(), TeamRole::Owner))
        .await?;

    info!("===========================================");
    info!("Initial admin user created!");
    info!("Email: {}", user.email());

    if from_env {
        info!("Password: (set via {})", ADMIN_PASSWORD_ENV);
    } else {
        info!("Password: {}", password);
    }

    info!("Please change this password after first login.");
    info!("===========================================");

    Ok(Some(user))
}
