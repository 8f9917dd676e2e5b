//! Authentication infrastructure module
//!
//! Password hashing with Argon2 and signed session tokens for cookie-based
//! authentication.

mod password;
mod session;

#[cfg(test)]
pub(crate) use password::test_hasher;
pub use password::{Argon2Hasher, PasswordHasher};
pub use session::{
    SessionClaims, SessionConfig, SessionManager, SessionToken, MAX_SESSION_TTL_HOURS,
    SESSION_COOKIE_NAME,
};
