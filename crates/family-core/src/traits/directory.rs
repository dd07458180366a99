//! Directory service port - the remote record store the roster is
//! reconciled against
//!
//! The domain layer defines what it needs here and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;
use crate::value_objects::{AccountId, AccountRecord, AccountStatus};

/// Record type holding one family member
pub const MEMBER_RECORD_TYPE: &str = "FamilyMember";

/// Result type for directory operations
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Flat field set stored per member record
///
/// Every field is optional on the wire; defaults are applied when a record
/// is mapped into a `Member`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberFields {
    pub name: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "deviceID")]
    pub device_id: Option<String>,
    #[serde(rename = "dateAdded")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, rename = "phoneNumber", skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// A record as returned by the directory, identified by its remote id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    pub id: String,
    pub fields: MemberFields,
}

impl DirectoryRecord {
    pub fn new(id: impl Into<String>, fields: MemberFields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Status of the signed-in account
    async fn get_account_status(&self) -> DirectoryResult<AccountStatus>;

    /// Canonical identifier of the signed-in account
    async fn get_current_account_id(&self) -> DirectoryResult<AccountId>;

    /// Account record used to resolve a display name
    async fn get_account_record(&self, id: &AccountId) -> DirectoryResult<AccountRecord>;

    /// All records of the given type
    async fn query_records(&self, record_type: &str) -> DirectoryResult<Vec<DirectoryRecord>>;

    /// Create a record; the returned record carries the directory-assigned id
    async fn save_record(
        &self,
        record_type: &str,
        fields: MemberFields,
    ) -> DirectoryResult<DirectoryRecord>;

    /// Delete a record by id
    async fn delete_record(&self, id: &str) -> DirectoryResult<()>;
}
