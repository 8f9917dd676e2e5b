//! Per-request context handed to every action

use crate::domain::activity::{ActivityType, NewActivity};
use crate::domain::user::{User, UserId};

/// Verified session user and client address for one request
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user: Option<User>,
    pub ip_address: Option<String>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: User) -> Self {
        Self {
            user: Some(user),
            ip_address: None,
        }
    }

    pub fn with_ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Activity row for `user_id`, stamped with this request's client address
    pub fn activity(&self, user_id: UserId, action: ActivityType) -> NewActivity {
        NewActivity::new(user_id, action, self.ip_address.clone())
    }
}
