//! # family-sync
//!
//! Application layer: keeps the local family roster reconciled with the
//! remote directory, applying optimistic updates ahead of remote
//! confirmation and publishing every change to subscribers.

pub mod dto;
pub mod services;

pub use dto::{
    ErrorInfo, HealthResponse, InviteRequest, MemberResponse, RegisterSelfRequest, SyncSnapshot,
};
pub use services::FamilyDirectorySync;
