//! HTTP handlers for presence endpoints.
//!
//! Read-only views over the connection registry.

use axum::extract::{Json, Path, State};

use crate::domain::foundation::Identity;

use super::super::error::ApiError;
use super::super::state::AppState;
use super::dto::{IdentityPresenceResponse, PresenceResponse};

/// GET /api/presence - Everyone online right now
pub async fn list_presence(State(state): State<AppState>) -> Json<PresenceResponse> {
    Json(state.registry().snapshot().into())
}

/// GET /api/presence/:identity - Handles for one identity
pub async fn get_identity_presence(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> Result<Json<IdentityPresenceResponse>, ApiError> {
    let identity = Identity::new(identity)?;
    let handles = state.registry().handles_of(&identity);
    Ok(Json(IdentityPresenceResponse::new(identity, handles)))
}
