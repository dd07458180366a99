//! Member entity - one family participant in the roster

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::traits::{DirectoryRecord, MemberFields};
use crate::value_objects::{FamilyRole, RolePermissions};

/// Prefix of ids assigned locally before the directory confirms a record
pub const PLACEHOLDER_ID_PREFIX: &str = "local-";

/// Name used when a record carries none
pub const UNKNOWN_MEMBER_NAME: &str = "Unknown";

/// Family member entity
///
/// `device_id` is the natural key: it identifies the underlying account
/// and is unique within a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub role: FamilyRole,
    pub device_id: String,
    pub is_active: bool,
    pub date_added: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl Member {
    /// Create a new Member
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: FamilyRole,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            device_id: device_id.into(),
            is_active: true,
            date_added: Utc::now(),
            email: None,
            phone_number: None,
        }
    }

    /// Create a member with a locally generated id, pending remote confirmation
    pub fn placeholder(name: impl Into<String>, role: FamilyRole, device_id: impl Into<String>) -> Self {
        Self::new(
            format!("{PLACEHOLDER_ID_PREFIX}{}", Uuid::new_v4()),
            name,
            role,
            device_id,
        )
    }

    /// Map a directory record, defaulting any missing field
    pub fn from_record(record: DirectoryRecord) -> Self {
        let DirectoryRecord { id, fields } = record;
        Self {
            id,
            name: fields
                .name
                .unwrap_or_else(|| UNKNOWN_MEMBER_NAME.to_string()),
            role: FamilyRole::from_record(fields.role.as_deref()),
            device_id: fields.device_id.unwrap_or_default(),
            is_active: true,
            date_added: fields.date_added.unwrap_or_else(Utc::now),
            email: fields.email,
            phone_number: fields.phone_number,
        }
    }

    /// Field set written to the directory for this member
    pub fn to_fields(&self) -> MemberFields {
        MemberFields {
            name: Some(self.name.clone()),
            role: Some(self.role.as_str().to_string()),
            device_id: Some(self.device_id.clone()),
            date_added: Some(self.date_added),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
        }
    }

    /// Return this member carrying the directory-confirmed id
    pub fn confirmed(mut self, remote_id: impl Into<String>) -> Self {
        self.id = remote_id.into();
        self
    }

    /// Whether the id is still a local placeholder
    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.id.starts_with(PLACEHOLDER_ID_PREFIX)
    }

    /// Whether this member represents the given account
    #[inline]
    pub fn is_account(&self, account_id: &str) -> bool {
        self.device_id == account_id
    }

    /// Permissions granted by the member's role
    #[inline]
    pub fn permissions(&self) -> RolePermissions {
        self.role.permissions()
    }

    /// Sample roster used for previews and demo seeding
    pub fn samples() -> Vec<Member> {
        vec![
            Member::new("1", "John Smith", FamilyRole::Owner, "device1"),
            Member::new("2", "Jane Smith", FamilyRole::Admin, "device2"),
            Member::new("3", "Alex Smith", FamilyRole::Member, "device3"),
        ]
    }
}
