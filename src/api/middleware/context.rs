//! Request context extraction from the session cookie

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::api::state::AppState;
use crate::infrastructure::action::RequestContext;

/// Extractor resolving the session cookie into a [`RequestContext`]
///
/// Never rejects: a missing, invalid or expired session yields an
/// anonymous context and protected actions answer `Unauthenticated`.
#[derive(Debug, Clone)]
pub struct Context(pub RequestContext);

impl FromRequestParts<AppState> for Context {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(state.sessions.cookie_name())
            .map(|cookie| cookie.value().to_string());

        let user = state
            .sessions
            .get_session(token.as_deref(), state.users.as_ref())
            .await;

        if token.is_some() && user.is_none() {
            debug!("Ignoring invalid session cookie");
        }

        let connect_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Ok(Context(RequestContext {
            user,
            ip_address: client_ip(&parts.headers).or(connect_addr),
        }))
    }
}

/// Client address from proxy headers, first hop first
///
/// Values that do not parse as an IP address are ignored.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    let header_ip = |name: &str, first_hop: bool| -> Option<IpAddr> {
        let value = headers.get(name)?.to_str().ok()?;
        let value = if first_hop {
            value.split(',').next()?
        } else {
            value
        };
        value.trim().parse::<IpAddr>().ok()
    };

    header_ip("x-forwarded-for", true)
        .or_else(|| header_ip("x-real-ip", false))
        .map(|ip| ip.to_string())
}
