//! Axum router configuration for presence endpoints.

use axum::{routing::get, Router};

use super::super::state::AppState;
use super::handlers::{get_identity_presence, list_presence};

/// Create the presence API router.
///
/// # Routes
/// - `GET /presence` - Snapshot of every online identity
/// - `GET /presence/:identity` - Handles held by one identity
pub fn presence_router() -> Router<AppState> {
    Router::new()
        .route("/presence", get(list_presence))
        .route("/presence/:identity", get(get_identity_presence))
}
