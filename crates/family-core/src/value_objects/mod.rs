//! Value objects - immutable types that represent domain concepts

mod account;
mod role;

pub use account::{AccountId, AccountIdentity, AccountRecord, AccountStatus, DEFAULT_MEMBER_NAME};
pub use role::{deserialize_role, FamilyRole, RoleParseError, RolePermissions};
