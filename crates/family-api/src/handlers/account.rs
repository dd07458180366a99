//! Account handlers
//!
//! Both commands run the full status -> identity -> roster chain in the
//! background and answer immediately with the current state.

use axum::{extract::State, Json};
use family_sync::SyncSnapshot;
use tracing::info;

use crate::response::Accepted;
use crate::state::AppState;

/// Start an account status check
///
/// POST /account/check
pub async fn check_account(State(state): State<AppState>) -> Accepted<Json<SyncSnapshot>> {
    let sync = state.sync().clone();
    tokio::spawn(async move { sync.check_account_status().await });
    info!("Account check started");

    Accepted(Json(state.sync().snapshot().await))
}

/// Report that the signed-in account changed
///
/// POST /account/changed
pub async fn account_changed(State(state): State<AppState>) -> Accepted<Json<SyncSnapshot>> {
    let sync = state.sync().clone();
    tokio::spawn(async move { sync.handle_account_changed().await });
    info!("Account change reported");

    Accepted(Json(state.sync().snapshot().await))
}
