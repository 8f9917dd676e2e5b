//! Activity log domain
//!
//! Append-only audit trail of security-relevant user actions.

mod entity;
mod repository;

pub use entity::{ActivityLogEntry, ActivityType, NewActivity};
pub use repository::ActivityLogRepository;
