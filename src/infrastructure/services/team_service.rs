//! Team membership actions and the team overview read model

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::activity::{ActivityLogRepository, ActivityType};
use crate::domain::team::{NewTeamMember, Team, TeamMember, TeamMemberId, TeamRepository, TeamRole};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::action::{
    messages, ActionResult, EchoedFields, FormSchema, InviteMemberForm, RemoveMemberForm,
    RequestContext,
};

/// Public view of a team member's user
#[derive(Debug, Clone, Serialize)]
pub struct MemberUser {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
}

/// A membership joined with its user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub id: TeamMemberId,
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
    pub user: MemberUser,
}

/// A team with its members, oldest member first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamOverview {
    #[serde(flatten)]
    pub team: Team,
    pub team_members: Vec<MemberView>,
}

/// Handles team invite/removal and builds the team overview
#[derive(Debug, Clone)]
pub struct TeamService {
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
    activity: Arc<dyn ActivityLogRepository>,
}

impl TeamService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        teams: Arc<dyn TeamRepository>,
        activity: Arc<dyn ActivityLogRepository>,
    ) -> Self {
        Self {
            users,
            teams,
            activity,
        }
    }

    async fn is_sole_member(&self, membership: &TeamMember) -> Result<bool, DomainError> {
        let members = self.teams.list_members(membership.team_id).await?;
        Ok(members.len() == 1 && members[0].id == membership.id)
    }

    /// The caller's membership, if it grants member management
    async fn owner_membership(
        &self,
        user: &User,
    ) -> Result<Result<TeamMember, ActionResult>, DomainError> {
        let Some(membership) = self.teams.find_membership(user.id()).await? else {
            return Ok(Err(ActionResult::rejected(
                messages::NO_TEAM,
                EchoedFields::new(),
            )));
        };

        if !membership.role.can_manage_members() {
            return Ok(Err(ActionResult::rejected(
                messages::NOT_TEAM_OWNER,
                EchoedFields::new(),
            )));
        }

        Ok(Ok(membership))
    }

    pub async fn invite_member(
        &self,
        ctx: &RequestContext,
        form: InviteMemberForm,
    ) -> Result<ActionResult, DomainError> {
        let Some(user) = ctx.user() else {
            return Ok(ActionResult::Unauthenticated);
        };

        if let Err(message) = form.check() {
            return Ok(ActionResult::validation_error(message, form.echoed()));
        }
        let Some(role) = form.team_role() else {
            return Ok(ActionResult::validation_error(
                "Role must be either owner or member",
                form.echoed(),
            ));
        };

        let membership = match self.owner_membership(user).await? {
            Ok(membership) => membership,
            Err(result) => return Ok(result),
        };

        let Some(invitee) = self.users.find_by_email(&form.email).await? else {
            return Ok(ActionResult::rejected(
                messages::INVITEE_NOT_FOUND,
                form.echoed(),
            ));
        };

        // Only a user alone in their personal team may be moved
        if let Some(current) = self.teams.find_membership(invitee.id()).await? {
            if current.team_id == membership.team_id || !self.is_sole_member(&current).await? {
                return Ok(ActionResult::rejected(
                    messages::INVITEE_HAS_TEAM,
                    form.echoed(),
                ));
            }

            self.teams.remove_member(current.id).await?;
            debug!(
                user_id = %invitee.id(),
                team_id = %current.team_id,
                "Invitee left their personal team"
            );
        }

        match self
            .teams
            .add_member(NewTeamMember::new(membership.team_id, invitee.id(), role))
            .await
        {
            Ok(_) => {}
            Err(e) if e.is_conflict() => {
                return Ok(ActionResult::rejected(
                    messages::INVITEE_HAS_TEAM,
                    form.echoed(),
                ));
            }
            Err(e) => return Err(e),
        }

        self.activity
            .append(ctx.activity(user.id(), ActivityType::InviteTeamMember))
            .await?;

        info!(
            user_id = %user.id(),
            team_id = %membership.team_id,
            invitee_id = %invitee.id(),
            action = "invite_team_member",
            "Team member added"
        );
        Ok(ActionResult::success(messages::MEMBER_ADDED, form.echoed()))
    }

    pub async fn remove_member(
        &self,
        ctx: &RequestContext,
        form: RemoveMemberForm,
    ) -> Result<ActionResult, DomainError> {
        let Some(user) = ctx.user() else {
            return Ok(ActionResult::Unauthenticated);
        };

        if let Err(message) = form.check() {
            return Ok(ActionResult::validation_error(message, form.echoed()));
        }
        let Some(member_id) = form.member_id().map(TeamMemberId::new) else {
            return Ok(ActionResult::validation_error(
                "Invalid member ID",
                form.echoed(),
            ));
        };

        let membership = match self.owner_membership(user).await? {
            Ok(membership) => membership,
            Err(result) => return Ok(result),
        };

        let target = self
            .teams
            .get_member(member_id)
            .await?
            .filter(|m| m.team_id == membership.team_id);

        let Some(target) = target else {
            return Ok(ActionResult::rejected(
                messages::MEMBER_NOT_FOUND,
                form.echoed(),
            ));
        };

        if target.user_id == user.id() {
            return Ok(ActionResult::rejected(
                messages::CANNOT_REMOVE_SELF,
                form.echoed(),
            ));
        }

        if !self.teams.remove_member(target.id).await? {
            return Ok(ActionResult::rejected(
                messages::MEMBER_NOT_FOUND,
                form.echoed(),
            ));
        }

        self.activity
            .append(ctx.activity(user.id(), ActivityType::RemoveTeamMember))
            .await?;

        info!(
            user_id = %user.id(),
            team_id = %membership.team_id,
            member_id = %target.id,
            action = "remove_team_member",
            "Team member removed"
        );
        Ok(ActionResult::success(
            messages::MEMBER_REMOVED,
            EchoedFields::new(),
        ))
    }

    /// The caller's team with its members, or `None` without a team
    pub async fn team_overview(&self, user: &User) -> Result<Option<TeamOverview>, DomainError> {
        let Some(membership) = self.teams.find_membership(user.id()).await? else {
            return Ok(None);
        };

        let Some(team) = self.teams.get_team(membership.team_id).await? else {
            return Ok(None);
        };

        let mut team_members = Vec::new();
        for member in self.teams.list_members(team.id).await? {
            // Memberships of deleted users are dropped with the account
            let Some(member_user) = self.users.get(member.user_id).await? else {
                continue;
            };
            if !member_user.is_active() {
                continue;
            }

            team_members.push(MemberView {
                id: member.id,
                role: member.role,
                joined_at: member.joined_at,
                user: MemberUser {
                    id: member_user.id(),
                    name: member_user.name().map(str::to_string),
                    email: member_user.email().to_string(),
                },
            });
        }

        Ok(Some(TeamOverview { team, team_members }))
    }
}
