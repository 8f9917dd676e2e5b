//! Account maintenance actions

use axum::{extract::State, response::Response};
use axum_extra::extract::cookie::CookieJar;

use crate::api::middleware::Context;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Form};
use crate::infrastructure::action::{DeleteAccountForm, UpdateAccountForm, UpdatePasswordForm};

use super::render;

/// POST /account
pub async fn update_account(
    State(state): State<AppState>,
    jar: CookieJar,
    Context(ctx): Context,
    Form(form): Form<UpdateAccountForm>,
) -> Result<(CookieJar, Response), ApiError> {
    let result = state.account_service.update_account(&ctx, form).await?;
    Ok(render(jar, &state.sessions, result))
}

/// POST /account/password
pub async fn update_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Context(ctx): Context,
    Form(form): Form<UpdatePasswordForm>,
) -> Result<(CookieJar, Response), ApiError> {
    let result = state.account_service.update_password(&ctx, form).await?;
    Ok(render(jar, &state.sessions, result))
}

/// POST /account/delete
pub async fn delete_account(
    State(state): State<AppState>,
    jar: CookieJar,
    Context(ctx): Context,
    Form(form): Form<DeleteAccountForm>,
) -> Result<(CookieJar, Response), ApiError> {
    let result = state.account_service.delete_account(&ctx, form).await?;
    Ok(render(jar, &state.sessions, result))
}
