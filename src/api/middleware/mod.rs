//! API middleware components

pub mod context;
pub mod logging;
pub mod security;

pub use context::{client_ip, Context};
pub use logging::logging_middleware;
pub use security::security_headers_middleware;
