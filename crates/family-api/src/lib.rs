//! # family-api
//!
//! REST API server built with Axum, exposing the family roster state, its
//! commands, and a WebSocket stream of change notifications.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{
    create_app, create_app_state, create_app_state_with, run, run_server, spawn_startup_check,
};
pub use state::AppState;
