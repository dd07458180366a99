//! Invitation entity - a shareable link inviting someone into the family
//!
//! Invitations are generated artifacts only. Nothing is written to the
//! roster or the directory when one is created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::value_objects::FamilyRole;

/// Invitation entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    pub token: Uuid,
    pub name: String,
    pub role: FamilyRole,
    pub inviter_id: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Errors building or reading an invitation link
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvitationError {
    #[error("Invalid invite base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid invite link: {0}")]
    InvalidLink(String),
}

impl Invitation {
    /// Create a new invitation with a fresh token
    pub fn new(
        base_url: &str,
        name: impl Into<String>,
        role: FamilyRole,
        inviter_id: impl Into<String>,
    ) -> Result<Self, InvitationError> {
        let base = Self::parse_base(base_url)?;
        Ok(Self::issue(&base, name, role, inviter_id))
    }

    /// Create an invitation against an already validated base URL
    pub fn issue(
        base: &Url,
        name: impl Into<String>,
        role: FamilyRole,
        inviter_id: impl Into<String>,
    ) -> Self {
        let token = Uuid::new_v4();
        let name = name.into();
        let url = invite_link(base, token, &name, role);

        Self {
            token,
            name,
            role,
            inviter_id: inviter_id.into(),
            url: url.into(),
            created_at: Utc::now(),
        }
    }

    /// Validate the base URL invite links are built on
    pub fn parse_base(base_url: &str) -> Result<Url, InvitationError> {
        let base = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| InvitationError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(InvitationError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(base)
    }

    /// Read the token, invitee name and role back out of a link
    pub fn parse_link(link: &str) -> Result<(Uuid, String, FamilyRole), InvitationError> {
        let url = Url::parse(link).map_err(|e| InvitationError::InvalidLink(e.to_string()))?;

        let mut token = None;
        let mut name = None;
        let mut role = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => token = Uuid::parse_str(&value).ok(),
                "name" => name = Some(value.into_owned()),
                "role" => role = value.parse::<FamilyRole>().ok(),
                _ => {}
            }
        }

        match (token, name, role) {
            (Some(token), Some(name), Some(role)) => Ok((token, name, role)),
            _ => Err(InvitationError::InvalidLink(link.to_string())),
        }
    }
}

/// Build `<base>/invite?code=..&name=..&role=..`
fn invite_link(base: &Url, token: Uuid, name: &str, role: FamilyRole) -> Url {
    let mut url = base.clone();
    let path = format!("{}/invite", url.path().trim_end_matches('/'));
    url.set_path(&path);
    url.query_pairs_mut()
        .clear()
        .append_pair("code", &token.to_string())
        .append_pair("name", name)
        .append_pair("role", role.as_str());
    url
}
