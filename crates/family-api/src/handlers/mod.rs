//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod account;
pub mod events;
pub mod health;
pub mod invites;
pub mod members;
pub mod roster;
