//! Signed session tokens carried in an HTTP-only cookie

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// Default name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "session";

/// Longest accepted session lifetime (100 years)
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 100;

/// Claims embedded in a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Absolute expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl SessionClaims {
    /// Create claims for a user issued at `now`
    pub fn new(user_id: UserId, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Expiry is inclusive: a token is dead at its `exp` second
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Get user ID from claims
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse::<i64>().ok().map(UserId::new)
    }
}

/// Configuration for session issuance
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Secret used to sign tokens
    pub secret: String,
    /// Fixed lifetime of a session from issuance
    pub ttl: Duration,
    /// Cookie that carries the token
    pub cookie_name: String,
    /// Mark the cookie `Secure`
    pub secure_cookie: bool,
}

impl SessionConfig {
    /// Fails when `ttl_hours` is zero or too large to represent
    pub fn new(secret: impl Into<String>, ttl_hours: u64) -> Result<Self, DomainError> {
        let ttl = i64::try_from(ttl_hours)
            .ok()
            .filter(|hours| (1..=MAX_SESSION_TTL_HOURS).contains(hours))
            .and_then(Duration::try_hours)
            .ok_or_else(|| {
                DomainError::configuration(format!(
                    "auth.session_ttl_hours must be between 1 and {} hours, got {}",
                    MAX_SESSION_TTL_HOURS, ttl_hours
                ))
            })?;

        Ok(Self {
            secret: secret.into(),
            ttl,
            cookie_name: SESSION_COOKIE_NAME.to_string(),
            secure_cookie: true,
        })
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    pub fn with_secure_cookie(mut self, secure: bool) -> Self {
        self.secure_cookie = secure;
        self
    }
}

/// A freshly signed session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates session tokens
#[derive(Clone)]
pub struct SessionManager {
    config: SessionConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.config.ttl)
            .field("cookie_name", &self.config.cookie_name)
            .field("secure_cookie", &self.config.secure_cookie)
            .field("keys", &"[hidden]")
            .finish()
    }
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Sign a session for `user`, valid for the configured TTL from now
    pub fn issue(&self, user: &User) -> Result<SessionToken, DomainError> {
        self.issue_at(user, Utc::now())
    }

    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<SessionToken, DomainError> {
        let claims = SessionClaims::new(user.id(), now, self.config.ttl);

        let value = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign session: {}", e)))?;

        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(|| DomainError::internal("Session expiry out of range"))?;

        Ok(SessionToken { value, expires_at })
    }

    /// Verify signature and expiry; any failure is `None`
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Option<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against `now` below, without leeway
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = match decode::<SessionClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!(error = %e, "Rejected session token");
                return None;
            }
        };

        if claims.is_expired_at(now) {
            debug!(sub = %claims.sub, "Session token expired");
            return None;
        }

        Some(claims)
    }

    /// Resolve the cookie token to an active user
    pub async fn get_session(
        &self,
        token: Option<&str>,
        users: &dyn UserRepository,
    ) -> Option<User> {
        self.get_session_at(token, users, Utc::now()).await
    }

    pub async fn get_session_at(
        &self,
        token: Option<&str>,
        users: &dyn UserRepository,
        now: DateTime<Utc>,
    ) -> Option<User> {
        let claims = self.verify_at(token?, now)?;
        let user_id = claims.user_id()?;

        let user = match users.get(user_id).await {
            Ok(user) => user?,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to load session user");
                return None;
            }
        };

        if !user.is_active() {
            debug!(user_id = %user_id, "Session user is deleted");
            return None;
        }

        Some(user)
    }

    /// HTTP-only cookie carrying `token`
    pub fn session_cookie(&self, token: &SessionToken) -> Cookie<'static> {
        let builder = Cookie::build((self.config.cookie_name.clone(), token.value.clone()))
            .http_only(true)
            .secure(self.config.secure_cookie)
            .same_site(SameSite::Lax)
            .path("/");

        match time::OffsetDateTime::from_unix_timestamp(token.expires_at.timestamp()) {
            Ok(at) => builder.expires(at).build(),
            Err(_) => builder
                .max_age(time::Duration::seconds(self.config.ttl.num_seconds()))
                .build(),
        }
    }

    /// Cookie that, once removed from a jar, deletes the session on the client
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.config.cookie_name.clone(), ""))
            .path("/")
            .build()
    }
}
