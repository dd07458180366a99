//! Change notifications

mod roster_event;

pub use roster_event::{
    AccountStatusChangedEvent, ErrorRecordedEvent, IdentityResolvedEvent, InvitationCreatedEvent,
    MemberAddedEvent, MemberEvent, RosterEvent, RosterReplacedEvent,
};
