//! Activity log entry types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;

/// Security-relevant action recorded in the activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    SignUp,
    SignIn,
    SignOut,
    UpdatePassword,
    DeleteAccount,
    UpdateAccount,
    CreateTeam,
    InviteTeamMember,
    RemoveTeamMember,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SignUp => "SIGN_UP",
            Self::SignIn => "SIGN_IN",
            Self::SignOut => "SIGN_OUT",
            Self::UpdatePassword => "UPDATE_PASSWORD",
            Self::DeleteAccount => "DELETE_ACCOUNT",
            Self::UpdateAccount => "UPDATE_ACCOUNT",
            Self::CreateTeam => "CREATE_TEAM",
            Self::InviteTeamMember => "INVITE_TEAM_MEMBER",
            Self::RemoveTeamMember => "REMOVE_TEAM_MEMBER",
        }
    }
}

impl std::str::FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s {
            "SIGN_UP" => Self::SignUp,
            "SIGN_IN" => Self::SignIn,
            "SIGN_OUT" => Self::SignOut,
            "UPDATE_PASSWORD" => Self::UpdatePassword,
            "DELETE_ACCOUNT" => Self::DeleteAccount,
            "UPDATE_ACCOUNT" => Self::UpdateAccount,
            "CREATE_TEAM" => Self::CreateTeam,
            "INVITE_TEAM_MEMBER" => Self::InviteTeamMember,
            "REMOVE_TEAM_MEMBER" => Self::RemoveTeamMember,
            other => return Err(format!("Unknown activity type: {}", other)),
        };
        Ok(action)
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activity to append; the store stamps id and timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub user_id: UserId,
    pub action: ActivityType,
    pub ip_address: Option<String>,
}

impl NewActivity {
    pub fn new(user_id: UserId, action: ActivityType, ip_address: Option<String>) -> Self {
        Self {
            user_id,
            action,
            ip_address,
        }
    }
}

/// Immutable activity log row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityLogEntry {
    pub id: i64,
    pub user_id: UserId,
    pub action: ActivityType,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_type_round_trips_through_str() {
        for action in [
            ActivityType::SignUp,
            ActivityType::DeleteAccount,
            ActivityType::RemoveTeamMember,
        ] {
            assert_eq!(action.as_str().parse::<ActivityType>(), Ok(action));
        }
        assert!("DROP_TABLE".parse::<ActivityType>().is_err());
    }

    #[test]
    fn test_activity_type_serialization() {
        assert_eq!(
            serde_json::to_string(&ActivityType::UpdatePassword).unwrap(),
            "\"UPDATE_PASSWORD\""
        );
    }
}
