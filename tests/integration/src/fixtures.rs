//! Test fixtures: request bodies and response shapes
//!
//! Response types only declare the fields the tests look at.

use serde::{Deserialize, Serialize};

/// Register-self request
#[derive(Debug, Default, Serialize)]
pub struct RegisterSelfBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl RegisterSelfBody {
    pub fn with_role(role: &str) -> Self {
        Self {
            role: Some(role.to_string()),
        }
    }
}

/// Invite request
#[derive(Debug, Serialize)]
pub struct InviteBody {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl InviteBody {
    pub fn new(name: &str, role: &str) -> Self {
        Self {
            name: name.to_string(),
            role: Some(role.to_string()),
        }
    }
}

/// Sync state snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct StateResponse {
    pub signed_in: bool,
    pub loading: bool,
    pub account_status: Option<String>,
    pub identity: Option<IdentityResponse>,
    pub is_current_user_member: bool,
    pub members: Vec<MemberResponse>,
    pub last_error: Option<ErrorInfo>,
}

impl StateResponse {
    pub fn member_by_device(&self, device_id: &str) -> Option<&MemberResponse> {
        self.members.iter().find(|m| m.device_id == device_id)
    }

    pub fn error_code(&self) -> Option<&str> {
        self.last_error.as_ref().map(|e| e.code.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberResponse {
    pub id: String,
    pub name: String,
    pub role: String,
    pub device_id: String,
    pub is_active: bool,
    pub permissions: Vec<String>,
    pub is_current_user: bool,
    pub pending: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

/// Invitation
#[derive(Debug, Deserialize)]
pub struct InvitationResponse {
    pub token: String,
    pub name: String,
    pub role: String,
    pub inviter_id: String,
    pub url: String,
}

/// Error response body
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorInfo,
}
