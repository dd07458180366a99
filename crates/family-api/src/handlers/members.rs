//! Member handlers
//!
//! Endpoints for registering the current account and removing members.

use axum::{
    extract::{Path, State},
    Json,
};
use family_sync::{RegisterSelfRequest, SyncSnapshot};

use crate::extractors::OptionalValidatedJson;
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Register the signed-in account as a member
///
/// POST /members/self
pub async fn register_self(
    State(state): State<AppState>,
    OptionalValidatedJson(request): OptionalValidatedJson<RegisterSelfRequest>,
) -> ApiResult<Created<Json<SyncSnapshot>>> {
    let role = request.unwrap_or_default().role();
    state.sync().register_self(role).await?;
    Ok(Created(Json(state.sync().snapshot().await)))
}

/// Remove a member; unknown ids are ignored
///
/// DELETE /members/{member_id}
pub async fn remove_member(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
) -> NoContent {
    state.sync().remove_member(&member_id).await;
    NoContent
}
