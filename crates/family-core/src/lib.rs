//! # family-core
//!
//! Domain layer containing the member entity, roles and their permissions,
//! invitations, change notifications, and the directory service port.
//! This crate has zero dependencies on infrastructure.

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Invitation, InvitationError, Member};
pub use error::{DirectoryError, SyncError, SyncResult};
pub use events::RosterEvent;
pub use traits::{DirectoryRecord, DirectoryResult, DirectoryService, MemberFields, MEMBER_RECORD_TYPE};
pub use value_objects::{
    AccountId, AccountIdentity, AccountRecord, AccountStatus, FamilyRole, RolePermissions,
    DEFAULT_MEMBER_NAME,
};
