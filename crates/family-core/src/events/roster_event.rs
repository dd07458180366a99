//! Change notifications emitted whenever synchronization state changes
//!
//! Subscribers (UI bindings, the WebSocket stream) observe these in the
//! order the underlying mutations were applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Invitation, Member};
use crate::value_objects::{AccountIdentity, AccountStatus};

/// All change notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RosterEvent {
    AccountStatusChanged(AccountStatusChangedEvent),
    IdentityResolved(IdentityResolvedEvent),
    RosterReplaced(RosterReplacedEvent),
    MemberAdded(MemberAddedEvent),
    MemberPresent(MemberEvent),
    MemberRemoved(MemberEvent),
    MemberRestored(MemberEvent),
    InvitationCreated(InvitationCreatedEvent),
    ErrorRecorded(ErrorRecordedEvent),
}

impl RosterEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::AccountStatusChanged(_) => "ACCOUNT_STATUS_CHANGED",
            Self::IdentityResolved(_) => "IDENTITY_RESOLVED",
            Self::RosterReplaced(_) => "ROSTER_REPLACED",
            Self::MemberAdded(_) => "MEMBER_ADDED",
            Self::MemberPresent(_) => "MEMBER_PRESENT",
            Self::MemberRemoved(_) => "MEMBER_REMOVED",
            Self::MemberRestored(_) => "MEMBER_RESTORED",
            Self::InvitationCreated(_) => "INVITATION_CREATED",
            Self::ErrorRecorded(_) => "ERROR_RECORDED",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::AccountStatusChanged(e) => e.timestamp,
            Self::IdentityResolved(e) => e.timestamp,
            Self::RosterReplaced(e) => e.timestamp,
            Self::MemberAdded(e) => e.timestamp,
            Self::MemberPresent(e) | Self::MemberRemoved(e) | Self::MemberRestored(e) => e.timestamp,
            Self::InvitationCreated(e) => e.timestamp,
            Self::ErrorRecorded(e) => e.timestamp,
        }
    }

    pub fn account_status(signed_in: bool, status: Option<AccountStatus>) -> Self {
        Self::AccountStatusChanged(AccountStatusChangedEvent {
            signed_in,
            status,
            timestamp: Utc::now(),
        })
    }

    pub fn identity_resolved(identity: AccountIdentity) -> Self {
        Self::IdentityResolved(IdentityResolvedEvent {
            identity,
            timestamp: Utc::now(),
        })
    }

    pub fn roster_replaced(members: Vec<Member>) -> Self {
        Self::RosterReplaced(RosterReplacedEvent {
            members,
            timestamp: Utc::now(),
        })
    }

    pub fn member_added(member: Member, confirmed: bool) -> Self {
        Self::MemberAdded(MemberAddedEvent {
            member,
            confirmed,
            timestamp: Utc::now(),
        })
    }

    pub fn member_present(member: Member) -> Self {
        Self::MemberPresent(MemberEvent::now(member))
    }

    pub fn member_removed(member: Member) -> Self {
        Self::MemberRemoved(MemberEvent::now(member))
    }

    pub fn member_restored(member: Member) -> Self {
        Self::MemberRestored(MemberEvent::now(member))
    }

    pub fn invitation_created(invitation: Invitation) -> Self {
        Self::InvitationCreated(InvitationCreatedEvent {
            invitation,
            timestamp: Utc::now(),
        })
    }

    pub fn error_recorded(code: &str, message: impl Into<String>) -> Self {
        Self::ErrorRecorded(ErrorRecordedEvent {
            code: code.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
        })
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStatusChangedEvent {
    pub signed_in: bool,
    pub status: Option<AccountStatus>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityResolvedEvent {
    pub identity: AccountIdentity,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterReplacedEvent {
    pub members: Vec<Member>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberAddedEvent {
    pub member: Member,
    /// `false` for the optimistic insert, `true` once the directory confirmed it
    pub confirmed: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberEvent {
    pub member: Member,
    pub timestamp: DateTime<Utc>,
}

impl MemberEvent {
    fn now(member: Member) -> Self {
        Self {
            member,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationCreatedEvent {
    pub invitation: Invitation,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecordedEvent {
    pub code: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
