//! Error types for roster synchronization and the directory port

use thiserror::Error;

use crate::value_objects::AccountStatus;

/// Errors reported by a directory service implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("Network failure: {0}")]
    Network(String),

    #[error("Not authenticated with the directory service")]
    NotAuthenticated,

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Directory error: {0}")]
    Internal(String),
}

impl DirectoryError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Errors surfaced by roster synchronization
///
/// `MissingIdentity` and `NotRegistered` are returned from operations
/// before any remote call. Everything else is only ever recorded as the
/// last error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("Account not available: {}", .status.raw())]
    AccountUnavailable { status: AccountStatus },

    #[error("Directory call failed: {0}")]
    TransportFailure(#[source] DirectoryError),

    #[error("No account identity resolved")]
    MissingIdentity,

    #[error("Current account is not a registered family member")]
    NotRegistered,

    #[error("Member not found: {0}")]
    RecordNotFound(String),
}

impl SyncError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::AccountUnavailable { .. } => "ACCOUNT_UNAVAILABLE",
            Self::TransportFailure(_) => "TRANSPORT_FAILURE",
            Self::MissingIdentity => "MISSING_IDENTITY",
            Self::NotRegistered => "NOT_REGISTERED",
            Self::RecordNotFound(_) => "RECORD_NOT_FOUND",
        }
    }

    /// Whether the error came from a failed remote call
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::AccountUnavailable { .. } | Self::TransportFailure(_))
    }

    /// Whether the error is a failed precondition raised before any remote call
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::MissingIdentity | Self::NotRegistered)
    }
}

impl From<DirectoryError> for SyncError {
    fn from(err: DirectoryError) -> Self {
        Self::TransportFailure(err)
    }
}

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;
