//! In-memory team repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::team::{
    checked_team_name, NewTeamMember, Team, TeamId, TeamMember, TeamMemberId, TeamRepository,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct State {
    teams: BTreeMap<i64, Team>,
    members: BTreeMap<i64, TeamMember>,
    next_team_id: i64,
    next_member_id: i64,
}

/// In-memory implementation of TeamRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryTeamRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn create_team(&self, name: &str) -> Result<Team, DomainError> {
        let name = checked_team_name(name).map_err(|e| DomainError::validation(e.to_string()))?;
        let mut state = self.state.write().await;

        state.next_team_id += 1;
        let team = Team::new(TeamId::new(state.next_team_id), name, Utc::now());
        state.teams.insert(team.id.value(), team.clone());

        Ok(team)
    }

    async fn get_team(&self, id: TeamId) -> Result<Option<Team>, DomainError> {
        let state = self.state.read().await;
        Ok(state.teams.get(&id.value()).cloned())
    }

    async fn add_member(&self, member: NewTeamMember) -> Result<TeamMember, DomainError> {
        let mut state = self.state.write().await;

        if !state.teams.contains_key(&member.team_id.value()) {
            return Err(DomainError::not_found(format!(
                "Team '{}' not found",
                member.team_id
            )));
        }

        if state.members.values().any(|m| m.user_id == member.user_id) {
            return Err(DomainError::conflict(format!(
                "User '{}' already belongs to a team",
                member.user_id
            )));
        }

        state.next_member_id += 1;
        let member = TeamMember {
            id: TeamMemberId::new(state.next_member_id),
            team_id: member.team_id,
            user_id: member.user_id,
            role: member.role,
            joined_at: Utc::now(),
        };
        state.members.insert(member.id.value(), member.clone());

        Ok(member)
    }

    async fn get_member(&self, id: TeamMemberId) -> Result<Option<TeamMember>, DomainError> {
        let state = self.state.read().await;
        Ok(state.members.get(&id.value()).cloned())
    }

    async fn find_membership(&self, user_id: UserId) -> Result<Option<TeamMember>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .members
            .values()
            .find(|m| m.user_id == user_id)
            .cloned())
    }

    async fn list_members(&self, team_id: TeamId) -> Result<Vec<TeamMember>, DomainError> {
        let state = self.state.read().await;

        // BTreeMap keys are assigned in join order
        Ok(state
            .members
            .values()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn remove_member(&self, id: TeamMemberId) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        Ok(state.members.remove(&id.value()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::team::TeamRole;

    #[tokio::test]
    async fn test_create_and_get_team() {
        let repo = InMemoryTeamRepository::new();

        let team = repo.create_team("Team One").await.unwrap();
        assert_eq!(team.id.value(), 1);

        let retrieved = repo.get_team(team.id).await.unwrap().unwrap();
        assert_eq!(retrieved.name, "Team One");
        assert!(repo.get_team(TeamId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_team_rejects_empty_name() {
        let repo = InMemoryTeamRepository::new();

        let result = repo.create_team("   ").await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_user_can_only_join_one_team() {
        let repo = InMemoryTeamRepository::new();
        let first = repo.create_team("First").await.unwrap();
        let second = repo.create_team("Second").await.unwrap();
        let user = UserId::new(7);

        repo.add_member(NewTeamMember::new(first.id, user, TeamRole::Owner))
            .await
            .unwrap();

        let result = repo
            .add_member(NewTeamMember::new(second.id, user, TeamRole::Member))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_add_member_to_missing_team() {
        let repo = InMemoryTeamRepository::new();

        let result = repo
            .add_member(NewTeamMember::new(
                TeamId::new(5),
                UserId::new(1),
                TeamRole::Member,
            ))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_and_remove_members() {
        let repo = InMemoryTeamRepository::new();
        let team = repo.create_team("Team").await.unwrap();

        let owner = repo
            .add_member(NewTeamMember::new(team.id, UserId::new(1), TeamRole::Owner))
            .await
            .unwrap();
        let member = repo
            .add_member(NewTeamMember::new(team.id, UserId::new(2), TeamRole::Member))
            .await
            .unwrap();

        let members = repo.list_members(team.id).await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].id, owner.id);

        assert!(repo.remove_member(member.id).await.unwrap());
        assert!(!repo.remove_member(member.id).await.unwrap());
        assert!(repo.find_membership(UserId::new(2)).await.unwrap().is_none());
        assert_eq!(
            repo.find_membership(UserId::new(1)).await.unwrap().unwrap().role,
            TeamRole::Owner
        );
    }
}
