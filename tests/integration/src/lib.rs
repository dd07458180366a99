//! Integration test utilities for the family sync server
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API and the WebSocket event stream.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
