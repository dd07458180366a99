//! Family roles and the fixed permission set each one grants
//!
//! Roles are a closed set. The permission mapping is not configurable:
//! Owner and Admin may add members, only Owner may remove them, and a
//! Viewer is read-only.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Permission flags derived from a [`FamilyRole`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RolePermissions: u8 {
        /// Register a new vehicle profile
        const ADD_CAR        = 1 << 0;
        /// Edit an existing vehicle profile
        const EDIT_CAR       = 1 << 1;
        /// Delete a vehicle profile
        const DELETE_CAR     = 1 << 2;
        /// Invite new family members
        const ADD_MEMBERS    = 1 << 3;
        /// Remove family members
        const REMOVE_MEMBERS = 1 << 4;

        /// Everything (owners)
        const ALL = Self::ADD_CAR.bits()
            | Self::EDIT_CAR.bits()
            | Self::DELETE_CAR.bits()
            | Self::ADD_MEMBERS.bits()
            | Self::REMOVE_MEMBERS.bits();
    }
}

impl RolePermissions {
    #[inline]
    pub fn can_add_car(&self) -> bool {
        self.contains(Self::ADD_CAR)
    }

    #[inline]
    pub fn can_edit_car(&self) -> bool {
        self.contains(Self::EDIT_CAR)
    }

    #[inline]
    pub fn can_delete_car(&self) -> bool {
        self.contains(Self::DELETE_CAR)
    }

    #[inline]
    pub fn can_add_members(&self) -> bool {
        self.contains(Self::ADD_MEMBERS)
    }

    #[inline]
    pub fn can_remove_members(&self) -> bool {
        self.contains(Self::REMOVE_MEMBERS)
    }

    /// Get a list of all individual permissions that are set
    pub fn list(&self) -> Vec<&'static str> {
        let mut result = Vec::new();
        if self.can_add_car() {
            result.push("ADD_CAR");
        }
        if self.can_edit_car() {
            result.push("EDIT_CAR");
        }
        if self.can_delete_car() {
            result.push("DELETE_CAR");
        }
        if self.can_add_members() {
            result.push("ADD_MEMBERS");
        }
        if self.can_remove_members() {
            result.push("REMOVE_MEMBERS");
        }
        result
    }
}

impl Default for RolePermissions {
    fn default() -> Self {
        RolePermissions::empty()
    }
}

// Serialized as the list of granted permission names
impl Serialize for RolePermissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.list())
    }
}

/// Role of a family member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FamilyRole {
    Owner,
    Admin,
    #[default]
    Member,
    Viewer,
}

impl FamilyRole {
    /// All roles, most privileged first
    pub const ALL: [FamilyRole; 4] = [Self::Owner, Self::Admin, Self::Member, Self::Viewer];

    /// Permissions granted by this role
    pub const fn permissions(self) -> RolePermissions {
        match self {
            Self::Owner => RolePermissions::ALL,
            Self::Admin => RolePermissions::ADD_CAR
                .union(RolePermissions::EDIT_CAR)
                .union(RolePermissions::DELETE_CAR)
                .union(RolePermissions::ADD_MEMBERS),
            Self::Member => RolePermissions::ADD_CAR.union(RolePermissions::EDIT_CAR),
            Self::Viewer => RolePermissions::empty(),
        }
    }

    /// Name as stored in directory records
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "Owner",
            Self::Admin => "Admin",
            Self::Member => "Member",
            Self::Viewer => "Viewer",
        }
    }

    /// Map a stored role string, falling back to `Member` for anything unknown
    pub fn from_record(value: Option<&str>) -> Self {
        value.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for FamilyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing a role name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown family role: {0}")]
pub struct RoleParseError(pub String);

impl FromStr for FamilyRole {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            "viewer" => Ok(Self::Viewer),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

/// Deserialize a role leniently from any casing (for request bodies)
pub fn deserialize_role<'de, D>(deserializer: D) -> Result<Option<FamilyRole>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| s.parse().map_err(serde::de::Error::custom))
        .transpose()
}
