//! Route definitions
//!
//! All API routes mounted under /api/v1, plus the health probe at the root.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{account, events, health, invites, members, roster};
use crate::state::AppState;

/// Create the main API router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(health_routes())
        .nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health::health_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(account_routes())
        .merge(roster_routes())
        .merge(member_routes())
        .route("/invites", post(invites::create_invite))
        .route("/events", get(events::events_handler))
}

/// Account routes
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/account/check", post(account::check_account))
        .route("/account/changed", post(account::account_changed))
}

/// Roster state routes
fn roster_routes() -> Router<AppState> {
    Router::new()
        .route("/state", get(roster::get_state))
        .route("/members", get(roster::list_members))
        .route("/roster/refresh", post(roster::refresh_roster))
}

/// Member routes
fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/members/self", post(members::register_self))
        .route("/members/:member_id", delete(members::remove_member))
}
