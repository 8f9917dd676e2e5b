//! Action result model

use std::collections::BTreeMap;

use crate::infrastructure::auth::SessionToken;

/// Non-password form inputs echoed back to the caller
pub type EchoedFields = BTreeMap<String, String>;

/// Redirect targets used by the console pages
pub mod paths {
    pub const DASHBOARD: &str = "/admin/dashboard";
    pub const LOGIN: &str = "/admin/login";
    pub const HOME: &str = "/";
}

/// User-facing messages
pub mod messages {
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password. Please try again.";
    pub const SIGN_UP_FAILED: &str = "Failed to create user. Please try again.";
    pub const UNAUTHENTICATED: &str = "User not authenticated";

    pub const CURRENT_PASSWORD_INCORRECT: &str = "Current password is incorrect.";
    pub const PASSWORD_UNCHANGED: &str =
        "New password must be different from the current password.";
    pub const PASSWORD_MISMATCH: &str = "New password and confirmation password do not match.";
    pub const PASSWORD_UPDATED: &str = "Password updated successfully.";

    pub const DELETE_PASSWORD_INCORRECT: &str = "Incorrect password. Account deletion failed.";

    pub const ACCOUNT_UPDATED: &str = "Account updated successfully.";
    pub const ACCOUNT_UPDATE_FAILED: &str = "Failed to update account. Please try again.";

    pub const NOT_TEAM_OWNER: &str = "Only team owners can manage members.";
    pub const NO_TEAM: &str = "You are not a member of any team.";
    pub const INVITEE_NOT_FOUND: &str = "No active user exists with that email address.";
    pub const INVITEE_HAS_TEAM: &str = "User is already a member of a team.";
    pub const MEMBER_ADDED: &str = "Member added successfully.";
    pub const MEMBER_NOT_FOUND: &str = "Team member not found.";
    pub const CANNOT_REMOVE_SELF: &str = "You cannot remove yourself from the team.";
    pub const MEMBER_REMOVED: &str = "Team member removed successfully.";
}

/// What to do with the session cookie alongside a redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    Issue(SessionToken),
    Clear,
}

/// Outcome of a form action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Redirect {
        location: &'static str,
        session: SessionChange,
    },
    Success {
        message: String,
        fields: EchoedFields,
    },
    ValidationError {
        message: String,
        fields: EchoedFields,
    },
    AuthError {
        message: String,
        fields: EchoedFields,
    },
    Rejected {
        message: String,
        fields: EchoedFields,
    },
    Unauthenticated,
}

impl ActionResult {
    pub fn redirect(location: &'static str, session: SessionChange) -> Self {
        Self::Redirect { location, session }
    }

    pub fn success(message: impl Into<String>, fields: EchoedFields) -> Self {
        Self::Success {
            message: message.into(),
            fields,
        }
    }

    pub fn validation_error(message: impl Into<String>, fields: EchoedFields) -> Self {
        Self::ValidationError {
            message: message.into(),
            fields,
        }
    }

    pub fn auth_error(message: impl Into<String>, fields: EchoedFields) -> Self {
        Self::AuthError {
            message: message.into(),
            fields,
        }
    }

    pub fn rejected(message: impl Into<String>, fields: EchoedFields) -> Self {
        Self::Rejected {
            message: message.into(),
            fields,
        }
    }

    /// Wire name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Redirect { .. } => "redirect",
            Self::Success { .. } => "success",
            Self::ValidationError { .. } => "validation_error",
            Self::AuthError { .. } => "auth_error",
            Self::Rejected { .. } => "rejected",
            Self::Unauthenticated => "unauthenticated",
        }
    }

    /// User-facing message, if the variant carries one
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { message, .. }
            | Self::ValidationError { message, .. }
            | Self::AuthError { message, .. }
            | Self::Rejected { message, .. } => Some(message),
            Self::Unauthenticated => Some(messages::UNAUTHENTICATED),
            Self::Redirect { .. } => None,
        }
    }

    pub fn fields(&self) -> Option<&EchoedFields> {
        match self {
            Self::Success { fields, .. }
            | Self::ValidationError { fields, .. }
            | Self::AuthError { fields, .. }
            | Self::Rejected { fields, .. } => Some(fields),
            _ => None,
        }
    }

    pub fn is_redirect_to(&self, path: &str) -> bool {
        matches!(self, Self::Redirect { location, .. } if *location == path)
    }
}
