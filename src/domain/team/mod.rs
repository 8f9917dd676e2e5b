//! Team domain module
//!
//! Teams group console users. Every account gets a personal team at sign-up,
//! and team owners may add or remove other existing users.

mod entity;
mod repository;
mod validation;

pub use entity::{
    checked_team_name, NewTeamMember, Team, TeamId, TeamMember, TeamMemberId, TeamRole,
};
pub use repository::TeamRepository;
pub use validation::{validate_team_name, TeamValidationError, MAX_TEAM_NAME_LENGTH};
