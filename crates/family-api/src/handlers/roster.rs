//! Roster handlers

use axum::{extract::State, Json};
use family_sync::{MemberResponse, SyncSnapshot};

use crate::state::AppState;

/// Current synchronization state
///
/// GET /state
pub async fn get_state(State(state): State<AppState>) -> Json<SyncSnapshot> {
    Json(state.sync().snapshot().await)
}

/// Current roster
///
/// GET /members
pub async fn list_members(State(state): State<AppState>) -> Json<Vec<MemberResponse>> {
    Json(state.sync().snapshot().await.members)
}

/// Re-fetch the roster from the directory and return it
///
/// POST /roster/refresh
pub async fn refresh_roster(State(state): State<AppState>) -> Json<SyncSnapshot> {
    state.sync().fetch_roster().await;
    Json(state.sync().snapshot().await)
}
