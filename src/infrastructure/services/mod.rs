//! Infrastructure services

mod account_service;
mod team_service;

pub use account_service::{AccountService, RECENT_ACTIVITY_LIMIT};
pub use team_service::{MemberUser, MemberView, TeamOverview, TeamService};
