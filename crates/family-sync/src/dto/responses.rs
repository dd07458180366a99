//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use family_core::{AccountIdentity, AccountStatus, Member, RolePermissions, SyncError};
use serde::Serialize;

/// Observable synchronization state at one point in time
#[derive(Debug, Clone, Serialize)]
pub struct SyncSnapshot {
    pub signed_in: bool,
    pub loading: bool,
    pub account_status: Option<AccountStatus>,
    pub identity: Option<AccountIdentity>,
    pub is_current_user_member: bool,
    pub members: Vec<MemberResponse>,
    pub last_error: Option<ErrorInfo>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// Member with its derived permissions
#[derive(Debug, Clone, Serialize)]
pub struct MemberResponse {
    #[serde(flatten)]
    pub member: Member,
    pub permissions: RolePermissions,
    pub is_current_user: bool,
    /// Not yet confirmed by the directory
    pub pending: bool,
}

impl MemberResponse {
    pub fn new(member: Member, current_account: Option<&str>) -> Self {
        Self {
            permissions: member.permissions(),
            is_current_user: current_account.is_some_and(|id| member.is_account(id)),
            pending: member.is_placeholder(),
            member,
        }
    }
}

/// Last recorded error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

impl From<&SyncError> for ErrorInfo {
    fn from(err: &SyncError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}
