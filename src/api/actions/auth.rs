//! Sign-in, sign-up and sign-out actions

use axum::{extract::State, response::Response};
use axum_extra::extract::cookie::CookieJar;

use crate::api::middleware::Context;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Form};
use crate::infrastructure::action::{SignInForm, SignUpForm};

use super::render;

/// POST /auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    Context(ctx): Context,
    Form(form): Form<SignInForm>,
) -> Result<(CookieJar, Response), ApiError> {
    let result = state.account_service.sign_in(&ctx, form).await?;
    Ok(render(jar, &state.sessions, result))
}

/// POST /auth/sign-up
pub async fn sign_up(
    State(state): State<AppState>,
    jar: CookieJar,
    Context(ctx): Context,
    Form(form): Form<SignUpForm>,
) -> Result<(CookieJar, Response), ApiError> {
    let result = state.account_service.sign_up(&ctx, form).await?;
    Ok(render(jar, &state.sessions, result))
}

/// POST /auth/sign-out
pub async fn sign_out(
    State(state): State<AppState>,
    jar: CookieJar,
    Context(ctx): Context,
) -> (CookieJar, Response) {
    let result = state.account_service.sign_out(&ctx).await;
    render(jar, &state.sessions, result)
}
