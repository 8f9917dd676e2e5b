//! PostgreSQL team repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::team::{
    checked_team_name, NewTeamMember, Team, TeamId, TeamMember, TeamMemberId, TeamRepository,
    TeamRole,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::map_write_error;

const MEMBER_COLUMNS: &str = "id, team_id, user_id, role, joined_at";

/// PostgreSQL implementation of TeamRepository
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn create_team(&self, name: &str) -> Result<Team, DomainError> {
        let name = checked_team_name(name).map_err(|e| DomainError::validation(e.to_string()))?;

        let row = sqlx::query("INSERT INTO teams (name) VALUES ($1) RETURNING id, name, created_at")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create team: {}", e)))?;

        Ok(row_to_team(&row))
    }

    async fn get_team(&self, id: TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query("SELECT id, name, created_at FROM teams WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get team: {}", e)))?;

        Ok(row.as_ref().map(row_to_team))
    }

    async fn add_member(&self, member: NewTeamMember) -> Result<TeamMember, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO team_members (team_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            MEMBER_COLUMNS
        ))
        .bind(member.team_id.value())
        .bind(member.user_id.value())
        .bind(member.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e
                .as_database_error()
                .is_some_and(|db| db.is_foreign_key_violation())
            {
                return DomainError::not_found(format!("Team '{}' not found", member.team_id));
            }
            map_write_error(
                e,
                format!("User '{}' already belongs to a team", member.user_id),
                "add team member",
            )
        })?;

        row_to_member(&row)
    }

    async fn get_member(&self, id: TeamMemberId) -> Result<Option<TeamMember>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM team_members WHERE id = $1",
            MEMBER_COLUMNS
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get team member: {}", e)))?;

        row.as_ref().map(row_to_member).transpose()
    }

    async fn find_membership(&self, user_id: UserId) -> Result<Option<TeamMember>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM team_members WHERE user_id = $1 LIMIT 1",
            MEMBER_COLUMNS
        ))
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get membership: {}", e)))?;

        row.as_ref().map(row_to_member).transpose()
    }

    async fn list_members(&self, team_id: TeamId) -> Result<Vec<TeamMember>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM team_members WHERE team_id = $1 ORDER BY id",
            MEMBER_COLUMNS
        ))
        .bind(team_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list team members: {}", e)))?;

        rows.iter().map(row_to_member).collect()
    }

    async fn remove_member(&self, id: TeamMemberId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to remove team member: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_team(row: &sqlx::postgres::PgRow) -> Team {
    Team::new(
        TeamId::new(row.get("id")),
        row.get::<String, _>("name"),
        row.get("created_at"),
    )
}

fn row_to_member(row: &sqlx::postgres::PgRow) -> Result<TeamMember, DomainError> {
    let role: String = row.get("role");
    let role = role
        .parse::<TeamRole>()
        .map_err(|e| DomainError::storage(format!("Invalid team role in database: {}", e)))?;

    Ok(TeamMember {
        id: TeamMemberId::new(row.get("id")),
        team_id: TeamId::new(row.get("team_id")),
        user_id: UserId::new(row.get("user_id")),
        role,
        joined_at: row.get("joined_at"),
    })
}
