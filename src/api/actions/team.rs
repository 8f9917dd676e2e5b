//! Team membership actions

use axum::{extract::State, response::Response};
use axum_extra::extract::cookie::CookieJar;

use crate::api::middleware::Context;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Form};
use crate::infrastructure::action::{InviteMemberForm, RemoveMemberForm};

use super::render;

/// POST /team/invite
pub async fn invite_member(
    State(state): State<AppState>,
    jar: CookieJar,
    Context(ctx): Context,
    Form(form): Form<InviteMemberForm>,
) -> Result<(CookieJar, Response), ApiError> {
    let result = state.team_service.invite_member(&ctx, form).await?;
    Ok(render(jar, &state.sessions, result))
}

/// POST /team/remove
pub async fn remove_member(
    State(state): State<AppState>,
    jar: CookieJar,
    Context(ctx): Context,
    Form(form): Form<RemoveMemberForm>,
) -> Result<(CookieJar, Response), ApiError> {
    let result = state.team_service.remove_member(&ctx, form).await?;
    Ok(render(jar, &state.sessions, result))
}
