//! Form schemas for the console actions

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use super::outcome::EchoedFields;
use crate::domain::team::TeamRole;

/// A validated form whose first error is reported in field declaration order
pub trait FormSchema: Validate {
    /// Field names in declaration order
    const FIELDS: &'static [&'static str];

    /// Inputs safe to send back to the caller
    fn echoed(&self) -> EchoedFields {
        EchoedFields::new()
    }

    /// Validate, reducing failures to the first error message
    fn check(&self) -> Result<(), String> {
        self.validate()
            .map_err(|errors| first_error_message(Self::FIELDS, &errors))
    }
}

/// First error message, walking `fields` in order
pub fn first_error_message(fields: &[&str], errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();

    for field in fields {
        let Some(list) = field_errors.get(*field) else {
            continue;
        };

        // Format problems outrank length problems on the same field
        let error = list
            .iter()
            .find(|e| e.code == "email")
            .or_else(|| list.first());

        if let Some(error) = error {
            return describe(error);
        }
    }

    "Invalid form submission".to_string()
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    match error.code.as_ref() {
        "email" => "Invalid email".to_string(),
        "length" => describe_length(error),
        code => format!("Invalid value ({})", code),
    }
}

fn describe_length(error: &ValidationError) -> String {
    let param = |name: &str| error.params.get(name).and_then(|v| v.as_u64());
    let actual = error
        .params
        .get("value")
        .and_then(|v| v.as_str())
        .map(|s| s.chars().count() as u64);

    match (param("min"), param("max"), actual) {
        (Some(min), _, Some(len)) if len < min => at_least(min),
        (_, Some(max), Some(len)) if len > max => at_most(max),
        (Some(min), _, None) => at_least(min),
        (None, Some(max), _) => at_most(max),
        _ => "Invalid length".to_string(),
    }
}

fn at_least(min: u64) -> String {
    format!("String must contain at least {} character(s)", min)
}

fn at_most(max: u64) -> String {
    format!("String must contain at most {} character(s)", max)
}

fn echo(pairs: &[(&str, &str)]) -> EchoedFields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();

    if len < 1 {
        let mut error = ValidationError::new("length");
        error.message = Some("Name is required".into());
        return Err(error);
    }

    if len > 100 {
        let mut error = ValidationError::new("length");
        error.message = Some(at_most(100).into());
        return Err(error);
    }

    Ok(())
}

fn validate_team_role(role: &str) -> Result<(), ValidationError> {
    role.parse::<TeamRole>().map(|_| ()).map_err(|_| {
        let mut error = ValidationError::new("role");
        error.message = Some("Role must be either owner or member".into());
        error
    })
}

fn validate_member_id(id: &str) -> Result<(), ValidationError> {
    match id.trim().parse::<i64>() {
        Ok(value) if value > 0 => Ok(()),
        _ => {
            let mut error = ValidationError::new("member_id");
            error.message = Some("Invalid member ID".into());
            Err(error)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct SignInForm {
    #[validate(email, length(min = 3, max = 255))]
    pub email: String,
    #[validate(length(min = 8, max = 100))]
    pub password: String,
}

impl FormSchema for SignInForm {
    const FIELDS: &'static [&'static str] = &["email", "password"];

    fn echoed(&self) -> EchoedFields {
        echo(&[("email", &self.email)])
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct SignUpForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

impl FormSchema for SignUpForm {
    const FIELDS: &'static [&'static str] = &["email", "password"];

    fn echoed(&self) -> EchoedFields {
        echo(&[("email", &self.email)])
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdatePasswordForm {
    #[validate(length(min = 8, max = 100))]
    pub current_password: String,
    #[validate(length(min = 8, max = 100))]
    pub new_password: String,
    #[validate(length(min = 8, max = 100))]
    pub confirm_password: String,
}

impl FormSchema for UpdatePasswordForm {
    const FIELDS: &'static [&'static str] =
        &["current_password", "new_password", "confirm_password"];
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct DeleteAccountForm {
    #[validate(length(min = 8, max = 100))]
    pub password: String,
}

impl FormSchema for DeleteAccountForm {
    const FIELDS: &'static [&'static str] = &["password"];
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateAccountForm {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

impl FormSchema for UpdateAccountForm {
    const FIELDS: &'static [&'static str] = &["name", "email"];

    fn echoed(&self) -> EchoedFields {
        echo(&[("name", &self.name), ("email", &self.email)])
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct InviteMemberForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_team_role"))]
    pub role: String,
}

impl InviteMemberForm {
    pub fn team_role(&self) -> Option<TeamRole> {
        self.role.parse().ok()
    }
}

impl FormSchema for InviteMemberForm {
    const FIELDS: &'static [&'static str] = &["email", "role"];

    fn echoed(&self) -> EchoedFields {
        echo(&[("email", &self.email), ("role", &self.role)])
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoveMemberForm {
    #[validate(custom(function = "validate_member_id"))]
    pub member_id: String,
}

impl RemoveMemberForm {
    pub fn member_id(&self) -> Option<i64> {
        self.member_id.trim().parse().ok().filter(|id| *id > 0)
    }
}

impl FormSchema for RemoveMemberForm {
    const FIELDS: &'static [&'static str] = &["member_id"];

    fn echoed(&self) -> EchoedFields {
        echo(&[("memberId", &self.member_id)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_in(email: &str, password: &str) -> SignInForm {
        SignInForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_sign_in_valid() {
        assert!(sign_in("a@b.com", "longenough1").check().is_ok());
    }

    #[test]
    fn test_sign_in_reports_email_before_password() {
        let message = sign_in("not-an-email", "short").check().unwrap_err();
        assert_eq!(message, "Invalid email");
    }

    #[test]
    fn test_sign_in_password_bounds() {
        assert_eq!(
            sign_in("a@b.com", "short").check().unwrap_err(),
            "String must contain at least 8 character(s)"
        );
        assert_eq!(
            sign_in("a@b.com", &"x".repeat(101)).check().unwrap_err(),
            "String must contain at most 100 character(s)"
        );
        assert!(sign_in("a@b.com", &"x".repeat(100)).check().is_ok());
    }

    #[test]
    fn test_sign_up_has_no_password_ceiling() {
        let form = SignUpForm {
            email: "a@b.com".to_string(),
            password: "x".repeat(500),
        };
        assert!(form.check().is_ok());
    }

    #[test]
    fn test_update_password_reports_fields_in_order() {
        let form = UpdatePasswordForm {
            current_password: "longenough1".to_string(),
            new_password: "short".to_string(),
            confirm_password: "tiny".to_string(),
        };
        assert_eq!(
            form.check().unwrap_err(),
            "String must contain at least 8 character(s)"
        );
        assert!(form.echoed().is_empty());
    }

    #[test]
    fn test_update_account_messages() {
        let form = UpdateAccountForm {
            name: String::new(),
            email: "bad".to_string(),
        };
        assert_eq!(form.check().unwrap_err(), "Name is required");

        let form = UpdateAccountForm {
            name: "Ada".to_string(),
            email: "bad".to_string(),
        };
        assert_eq!(form.check().unwrap_err(), "Invalid email address");
        assert_eq!(form.echoed().get("name").map(String::as_str), Some("Ada"));
    }

    #[test]
    fn test_update_account_name_too_long() {
        let form = UpdateAccountForm {
            name: "n".repeat(101),
            email: "a@b.com".to_string(),
        };
        assert_eq!(
            form.check().unwrap_err(),
            "String must contain at most 100 character(s)"
        );
    }

    #[test]
    fn test_invite_role() {
        let form = InviteMemberForm {
            email: "a@b.com".to_string(),
            role: "admin".to_string(),
        };
        assert_eq!(
            form.check().unwrap_err(),
            "Role must be either owner or member"
        );
        assert!(form.team_role().is_none());

        let form = InviteMemberForm {
            email: "a@b.com".to_string(),
            role: "owner".to_string(),
        };
        assert!(form.check().is_ok());
        assert_eq!(form.team_role(), Some(TeamRole::Owner));
    }

    #[test]
    fn test_member_id() {
        for bad in ["", "abc", "0", "-4"] {
            let form = RemoveMemberForm {
                member_id: bad.to_string(),
            };
            assert_eq!(form.check().unwrap_err(), "Invalid member ID");
            assert!(form.member_id().is_none());
        }

        let form = RemoveMemberForm {
            member_id: "12".to_string(),
        };
        assert!(form.check().is_ok());
        assert_eq!(form.member_id(), Some(12));
    }

    #[test]
    fn test_passwords_never_echoed() {
        let form = sign_in("a@b.com", "longenough1");
        let echoed = form.echoed();
        assert_eq!(echoed.len(), 1);
        assert!(echoed.values().all(|v| v != "longenough1"));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let form: SignInForm = serde_json::from_str(r#"{"email": "a@b.com"}"#).unwrap();
        assert_eq!(form.password, "");
        assert!(form.check().is_err());
    }
}
