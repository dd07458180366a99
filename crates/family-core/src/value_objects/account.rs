//! Account value objects - status, identifiers, and the account record
//! used to resolve a display name

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fallback label when no name can be resolved from the account record
pub const DEFAULT_MEMBER_NAME: &str = "Family Member";

/// Status of the account on the directory service
///
/// Raw codes follow the directory's own numbering and are carried in
/// `AccountUnavailable` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    CouldNotDetermine,
    Available,
    Restricted,
    NoAccount,
    TemporarilyUnavailable,
}

impl AccountStatus {
    /// Raw status code
    pub const fn raw(self) -> i32 {
        match self {
            Self::CouldNotDetermine => 0,
            Self::Available => 1,
            Self::Restricted => 2,
            Self::NoAccount => 3,
            Self::TemporarilyUnavailable => 4,
        }
    }

    /// Build from a raw status code
    pub const fn from_raw(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::CouldNotDetermine),
            1 => Some(Self::Available),
            2 => Some(Self::Restricted),
            3 => Some(Self::NoAccount),
            4 => Some(Self::TemporarilyUnavailable),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CouldNotDetermine => "could_not_determine",
            Self::Available => "available",
            Self::Restricted => "restricted",
            Self::NoAccount => "no_account",
            Self::TemporarilyUnavailable => "temporarily_unavailable",
        };
        f.write_str(name)
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "restricted" => Ok(Self::Restricted),
            "no_account" | "noaccount" => Ok(Self::NoAccount),
            "temporarily_unavailable" | "unavailable" => Ok(Self::TemporarilyUnavailable),
            "could_not_determine" | "indeterminate" => Ok(Self::CouldNotDetermine),
            other => other
                .parse::<i32>()
                .ok()
                .and_then(Self::from_raw)
                .ok_or_else(|| format!("unknown account status: {s}")),
        }
    }
}

/// Canonical account identifier issued by the directory service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Account record fields the directory may expose for the signed-in user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub device_name: Option<String>,
}

impl AccountRecord {
    /// Resolve a human-readable name
    ///
    /// Priority: first + last name, display name, email local part,
    /// device owner name, then [`DEFAULT_MEMBER_NAME`].
    pub fn resolve_display_name(&self) -> String {
        if let (Some(first), Some(last)) = (non_blank(&self.first_name), non_blank(&self.last_name)) {
            return format!("{first} {last}");
        }
        if let Some(display) = non_blank(&self.display_name) {
            return display.to_string();
        }
        if let Some(name) = non_blank(&self.email).and_then(name_from_email) {
            return name;
        }
        if let Some(name) = non_blank(&self.device_name).map(name_from_device) {
            return name;
        }
        DEFAULT_MEMBER_NAME.to_string()
    }
}

/// Resolved identity of the signed-in account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentity {
    pub id: String,
    pub name: String,
}

impl AccountIdentity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// "jane.smith@example.com" -> "Jane Smith"
fn name_from_email(email: &str) -> Option<String> {
    let local = email.split('@').next()?;
    let words: Vec<String> = local
        .split(['.', '_', '-'])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

// "Oleg's iPhone" -> "Oleg"
fn name_from_device(device: &str) -> String {
    for marker in ["'s ", "\u{2019}s "] {
        if let Some((owner, _)) = device.split_once(marker) {
            let owner = owner.trim();
            if !owner.is_empty() {
                return owner.to_string();
            }
        }
    }
    device.to_string()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
