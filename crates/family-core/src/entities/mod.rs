//! Domain entities - core business objects

mod invitation;
mod member;

pub use invitation::{Invitation, InvitationError};
pub use member::{Member, PLACEHOLDER_ID_PREFIX, UNKNOWN_MEMBER_NAME};
