//! Account actions: sign-in, sign-up, sign-out and self-service account changes

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::activity::{ActivityLogEntry, ActivityLogRepository, ActivityType};
use crate::domain::team::{NewTeamMember, Team, TeamRepository, TeamRole};
use crate::domain::user::{NewUser, User, UserRepository, UserRole};
use crate::domain::DomainError;
use crate::infrastructure::action::{
    messages, paths, ActionResult, DeleteAccountForm, EchoedFields, FormSchema, RequestContext,
    SessionChange, SignInForm, SignUpForm, UpdateAccountForm, UpdatePasswordForm,
};
use crate::infrastructure::auth::{PasswordHasher, SessionManager};

/// Entries returned by the activity feed
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

/// Handles the credential and account form actions
#[derive(Debug, Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    activity: Arc<dyn ActivityLogRepository>,
    teams: Arc<dyn TeamRepository>,
    hasher: Arc<dyn PasswordHasher>,
    sessions: Arc<SessionManager>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        activity: Arc<dyn ActivityLogRepository>,
        teams: Arc<dyn TeamRepository>,
        hasher: Arc<dyn PasswordHasher>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            users,
            activity,
            teams,
            hasher,
            sessions,
        }
    }

    pub async fn sign_in(
        &self,
        ctx: &RequestContext,
        form: SignInForm,
    ) -> Result<ActionResult, DomainError> {
        if let Err(message) = form.check() {
            return Ok(ActionResult::validation_error(message, form.echoed()));
        }

        let user = match self.users.find_by_email(&form.email).await? {
            Some(user) if self.hasher.verify(&form.password, user.password_hash()) => user,
            Some(user) => {
                debug!(user_id = %user.id(), "Sign-in rejected: wrong password");
                return Ok(invalid_credentials(&form));
            }
            None => {
                debug!("Sign-in rejected: unknown email");
                return Ok(invalid_credentials(&form));
            }
        };

        let (token, _) = tokio::try_join!(
            async { self.sessions.issue(&user) },
            self.activity
                .append(ctx.activity(user.id(), ActivityType::SignIn)),
        )?;

        info!(user_id = %user.id(), action = "sign_in", "User signed in");
        Ok(ActionResult::redirect(
            paths::DASHBOARD,
            SessionChange::Issue(token),
        ))
    }

    pub async fn sign_up(
        &self,
        ctx: &RequestContext,
        form: SignUpForm,
    ) -> Result<ActionResult, DomainError> {
        if let Err(message) = form.check() {
            return Ok(ActionResult::validation_error(message, form.echoed()));
        }

        if self.users.find_by_email(&form.email).await?.is_some() {
            debug!("Sign-up rejected: email in use");
            return Ok(ActionResult::rejected(messages::SIGN_UP_FAILED, form.echoed()));
        }

        let password_hash = self.hasher.hash(&form.password)?;
        let user = match self
            .users
            .insert(NewUser::new(&form.email, password_hash, UserRole::Admin))
            .await
        {
            Ok(user) => user,
            // Lost a race with a concurrent sign-up for the same email
            Err(e) if e.is_conflict() => {
                return Ok(ActionResult::rejected(messages::SIGN_UP_FAILED, form.echoed()));
            }
            Err(e) => return Err(e),
        };

        let team = self.teams.create_team(&Team::personal_name(user.email())).await?;
        self.teams
            .add_member(NewTeamMember::new(team.id, user.id(), TeamRole::Owner))
            .await?;

        let (token, _, _) = tokio::try_join!(
            async { self.sessions.issue(&user) },
            self.activity
                .append(ctx.activity(user.id(), ActivityType::SignUp)),
            self.activity
                .append(ctx.activity(user.id(), ActivityType::CreateTeam)),
        )?;

        info!(
            user_id = %user.id(),
            team_id = %team.id,
            action = "sign_up",
            "User signed up"
        );
        Ok(ActionResult::redirect(
            paths::DASHBOARD,
            SessionChange::Issue(token),
        ))
    }

    /// Always clears the session, even when the activity write fails
    pub async fn sign_out(&self, ctx: &RequestContext) -> ActionResult {
        if let Some(user) = ctx.user() {
            match self
                .activity
                .append(ctx.activity(user.id(), ActivityType::SignOut))
                .await
            {
                Ok(_) => info!(user_id = %user.id(), action = "sign_out", "User signed out"),
                Err(e) => warn!(user_id = %user.id(), error = %e, "Failed to log sign-out"),
            }
        }

        ActionResult::redirect(paths::HOME, SessionChange::Clear)
    }

    pub async fn update_password(
        &self,
        ctx: &RequestContext,
        form: UpdatePasswordForm,
    ) -> Result<ActionResult, DomainError> {
        let Some(user) = ctx.user() else {
            return Ok(ActionResult::Unauthenticated);
        };

        if let Err(message) = form.check() {
            return Ok(ActionResult::validation_error(message, form.echoed()));
        }

        if !self
            .hasher
            .verify(&form.current_password, user.password_hash())
        {
            return Ok(ActionResult::auth_error(
                messages::CURRENT_PASSWORD_INCORRECT,
                EchoedFields::new(),
            ));
        }

        if form.current_password == form.new_password {
            return Ok(ActionResult::rejected(
                messages::PASSWORD_UNCHANGED,
                EchoedFields::new(),
            ));
        }

        if form.confirm_password != form.new_password {
            return Ok(ActionResult::rejected(
                messages::PASSWORD_MISMATCH,
                EchoedFields::new(),
            ));
        }

        let new_hash = self.hasher.hash(&form.new_password)?;
        tokio::try_join!(
            self.users.update_password(user.id(), &new_hash),
            self.activity
                .append(ctx.activity(user.id(), ActivityType::UpdatePassword)),
        )?;

        info!(user_id = %user.id(), action = "update_password", "Password updated");
        Ok(ActionResult::success(
            messages::PASSWORD_UPDATED,
            EchoedFields::new(),
        ))
    }

    pub async fn delete_account(
        &self,
        ctx: &RequestContext,
        form: DeleteAccountForm,
    ) -> Result<ActionResult, DomainError> {
        let Some(user) = ctx.user() else {
            return Ok(ActionResult::Unauthenticated);
        };

        if let Err(message) = form.check() {
            return Ok(ActionResult::validation_error(message, form.echoed()));
        }

        if !self.hasher.verify(&form.password, user.password_hash()) {
            return Ok(ActionResult::auth_error(
                messages::DELETE_PASSWORD_INCORRECT,
                EchoedFields::new(),
            ));
        }

        self.activity
            .append(ctx.activity(user.id(), ActivityType::DeleteAccount))
            .await?;
        self.users.soft_delete(user.id()).await?;

        if let Some(membership) = self.teams.find_membership(user.id()).await? {
            self.teams.remove_member(membership.id).await?;
        }

        info!(user_id = %user.id(), action = "delete_account", "Account deleted");
        Ok(ActionResult::redirect(paths::LOGIN, SessionChange::Clear))
    }

    pub async fn update_account(
        &self,
        ctx: &RequestContext,
        form: UpdateAccountForm,
    ) -> Result<ActionResult, DomainError> {
        let Some(user) = ctx.user() else {
            return Ok(ActionResult::Unauthenticated);
        };

        if let Err(message) = form.check() {
            return Ok(ActionResult::validation_error(message, form.echoed()));
        }

        if form.email != user.email() && self.users.find_by_email(&form.email).await?.is_some() {
            return Ok(ActionResult::rejected(
                messages::ACCOUNT_UPDATE_FAILED,
                form.echoed(),
            ));
        }

        let updated = tokio::try_join!(
            self.users.update_account(user.id(), &form.name, &form.email),
            self.activity
                .append(ctx.activity(user.id(), ActivityType::UpdateAccount)),
        );

        match updated {
            Ok(_) => {}
            Err(e) if e.is_conflict() => {
                return Ok(ActionResult::rejected(
                    messages::ACCOUNT_UPDATE_FAILED,
                    form.echoed(),
                ));
            }
            Err(e) => return Err(e),
        }

        info!(user_id = %user.id(), action = "update_account", "Account updated");

        let mut fields = EchoedFields::new();
        fields.insert("name".to_string(), form.name);
        Ok(ActionResult::success(messages::ACCOUNT_UPDATED, fields))
    }

    /// The caller's most recent activity, newest first
    pub async fn recent_activity(&self, user: &User) -> Result<Vec<ActivityLogEntry>, DomainError> {
        self.activity
            .list_for_user(user.id(), RECENT_ACTIVITY_LIMIT)
            .await
    }
}

fn invalid_credentials(form: &SignInForm) -> ActionResult {
    ActionResult::auth_error(messages::INVALID_CREDENTIALS, form.echoed())
}
