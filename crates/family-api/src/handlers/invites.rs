//! Invite handlers

use axum::{extract::State, Json};
use family_core::Invitation;
use family_sync::InviteRequest;

use crate::extractors::ValidatedJson;
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Create an invitation link
///
/// POST /invites
pub async fn create_invite(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<InviteRequest>,
) -> ApiResult<Created<Json<Invitation>>> {
    let invitation = state.sync().invite(&request.name, request.role()).await?;
    Ok(Created(Json(invitation)))
}
