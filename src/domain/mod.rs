//! Domain layer - Core entities and repository contracts

pub mod activity;
pub mod error;
pub mod team;
pub mod user;

pub use activity::{ActivityLogEntry, ActivityLogRepository, ActivityType, NewActivity};
pub use error::DomainError;
pub use team::{NewTeamMember, Team, TeamId, TeamMember, TeamMemberId, TeamRepository, TeamRole};
pub use user::{NewUser, User, UserId, UserRepository, UserRole};
