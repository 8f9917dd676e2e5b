//! JSON read endpoints polled by the console pages

use axum::{extract::State, routing::get, Json, Router};

use crate::api::middleware::Context;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::activity::ActivityLogEntry;
use crate::domain::user::User;
use crate::infrastructure::action::messages;
use crate::infrastructure::services::TeamOverview;

/// Create the read-endpoint router
pub fn create_console_router() -> Router<AppState> {
    Router::new()
        .route("/user", get(current_user))
        .route("/team", get(current_team))
        .route("/activity", get(recent_activity))
}

/// GET /api/user
///
/// `null` when there is no valid session.
pub async fn current_user(Context(ctx): Context) -> Json<Option<User>> {
    Json(ctx.user)
}

/// GET /api/team
pub async fn current_team(
    State(state): State<AppState>,
    Context(ctx): Context,
) -> Result<Json<Option<TeamOverview>>, ApiError> {
    let Some(user) = ctx.user() else {
        return Ok(Json(None));
    };

    let overview = state.team_service.team_overview(user).await?;
    Ok(Json(overview))
}

/// GET /api/activity
///
/// Newest first. Anonymous callers get 401.
pub async fn recent_activity(
    State(state): State<AppState>,
    Context(ctx): Context,
) -> Result<Json<Vec<ActivityLogEntry>>, ApiError> {
    let user = ctx
        .user()
        .ok_or_else(|| ApiError::unauthorized(messages::UNAUTHENTICATED))?;

    let entries = state.account_service.recent_activity(user).await?;
    Ok(Json(entries))
}
