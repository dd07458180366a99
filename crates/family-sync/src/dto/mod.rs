//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs, including the observable sync state snapshot

pub mod requests;
pub mod responses;

pub use requests::{InviteRequest, RegisterSelfRequest};
pub use responses::{ErrorInfo, HealthResponse, MemberResponse, SyncSnapshot};
