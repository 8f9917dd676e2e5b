//! Team repository trait

use async_trait::async_trait;

use super::entity::{NewTeamMember, Team, TeamId, TeamMember, TeamMemberId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for teams and their memberships
#[async_trait]
pub trait TeamRepository: Send + Sync + std::fmt::Debug {
    /// Create a new team
    async fn create_team(&self, name: &str) -> Result<Team, DomainError>;

    /// Get a team by ID
    async fn get_team(&self, id: TeamId) -> Result<Option<Team>, DomainError>;

    /// Add a member; fails with `Conflict` if the user already has a team
    async fn add_member(&self, member: NewTeamMember) -> Result<TeamMember, DomainError>;

    /// Get a membership by ID
    async fn get_member(&self, id: TeamMemberId) -> Result<Option<TeamMember>, DomainError>;

    /// The membership held by a user, if any
    async fn find_membership(&self, user_id: UserId) -> Result<Option<TeamMember>, DomainError>;

    /// All memberships of a team, oldest first
    async fn list_members(&self, team_id: TeamId) -> Result<Vec<TeamMember>, DomainError>;

    /// Remove a membership, returning whether it existed
    async fn remove_member(&self, id: TeamMemberId) -> Result<bool, DomainError>;
}
