//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use family_core::value_objects::deserialize_role;
use family_core::FamilyRole;
use serde::Deserialize;
use validator::Validate;

/// Register the signed-in account as a family member
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterSelfRequest {
    /// Defaults to `Owner`
    #[serde(default, deserialize_with = "deserialize_role")]
    pub role: Option<FamilyRole>,
}

impl RegisterSelfRequest {
    pub fn role(&self) -> FamilyRole {
        self.role.unwrap_or(FamilyRole::Owner)
    }
}

/// Create an invitation link
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InviteRequest {
    #[validate(length(min = 1, max = 64, message = "Name must be 1-64 characters"))]
    pub name: String,

    /// Defaults to `Member`
    #[serde(default, deserialize_with = "deserialize_role")]
    pub role: Option<FamilyRole>,
}

impl InviteRequest {
    pub fn role(&self) -> FamilyRole {
        self.role.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_defaults_to_owner() {
        let request: RegisterSelfRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.role(), FamilyRole::Owner);

        let request: RegisterSelfRequest = serde_json::from_str(r#"{"role":"viewer"}"#).unwrap();
        assert_eq!(request.role(), FamilyRole::Viewer);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result: Result<InviteRequest, _> =
            serde_json::from_str(r#"{"name":"Alex","role":"guest"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_invite_validation() {
        let request: InviteRequest = serde_json::from_str(r#"{"name":"Alex"}"#).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.role(), FamilyRole::Member);

        let empty = InviteRequest {
            name: String::new(),
            role: None,
        };
        assert!(empty.validate().is_err());

        let long = InviteRequest {
            name: "x".repeat(65),
            role: None,
        };
        assert!(long.validate().is_err());
    }
}
