//! Form-action endpoints
//!
//! Every handler takes an urlencoded form, runs the matching service action
//! and renders the resulting [`ActionResult`].

mod account;
mod auth;
mod team;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use crate::api::state::AppState;
use crate::infrastructure::action::{ActionResult, EchoedFields, SessionChange};
use crate::infrastructure::auth::SessionManager;

pub use account::{delete_account, update_account, update_password};
pub use auth::{sign_in, sign_out, sign_up};
pub use team::{invite_member, remove_member};

/// Create the form-action router
pub fn create_actions_router() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-in", post(sign_in))
        .route("/auth/sign-up", post(sign_up))
        .route("/auth/sign-out", post(sign_out))
        .route("/account", post(update_account))
        .route("/account/password", post(update_password))
        .route("/account/delete", post(delete_account))
        .route("/team/invite", post(invite_member))
        .route("/team/remove", post(remove_member))
}

/// JSON body of every non-redirect action response
#[derive(Debug, Serialize)]
pub struct ActionBody<'a> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<&'a EchoedFields>,
}

/// Status code for each result kind
pub fn status_for(result: &ActionResult) -> StatusCode {
    match result {
        ActionResult::Redirect { .. } => StatusCode::SEE_OTHER,
        ActionResult::Success { .. } => StatusCode::OK,
        ActionResult::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ActionResult::Rejected { .. } => StatusCode::CONFLICT,
        ActionResult::AuthError { .. } | ActionResult::Unauthenticated => {
            StatusCode::UNAUTHORIZED
        }
    }
}

/// Apply the result's cookie change to the jar and build the response
pub fn render(
    jar: CookieJar,
    sessions: &SessionManager,
    result: ActionResult,
) -> (CookieJar, Response) {
    if let ActionResult::Redirect { location, session } = &result {
        let jar = match session {
            SessionChange::Issue(token) => jar.add(sessions.session_cookie(token)),
            SessionChange::Clear => jar.remove(sessions.removal_cookie()),
        };
        return (jar, Redirect::to(location).into_response());
    }

    let body = ActionBody {
        status: result.kind(),
        message: result.message(),
        fields: result.fields(),
    };
    let response = (status_for(&result), Json(body)).into_response();

    (jar, response)
}
