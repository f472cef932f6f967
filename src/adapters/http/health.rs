//! Root and health endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::domain::foundation::{ErrorCode, Timestamp};
use crate::domain::presence::PresenceStats;
use crate::ports::PoolStats;

use super::error::ErrorResponse;
use super::state::AppState;

/// GET / - Greeting
pub async fn welcome() -> &'static str {
    "Welcome to MiniMarket API"
}

/// Response for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when every dependency answered, `degraded` otherwise.
    pub status: &'static str,
    pub database: DatabaseStatus,
    pub presence: PresenceStats,
    pub logging: LoggingStatus,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct LoggingStatus {
    /// Lifecycle log records lost since startup.
    pub dropped: u64,
}

#[derive(Debug, Serialize)]
pub struct DatabaseStatus {
    pub reachable: bool,
    pub pool: PoolStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /health - Database reachability, pool sizing, presence counts and
/// lost log records
///
/// Responds `503 Service Unavailable` when the database ping fails.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let ping = state.database.ping().await;
    let reachable = ping.is_ok();
    if let Err(e) = &ping {
        tracing::warn!("Health check database ping failed: {}", e);
    }

    let body = HealthResponse {
        status: if reachable { "ok" } else { "degraded" },
        database: DatabaseStatus {
            reachable,
            pool: state.database.pool_stats(),
            error: ping.err().map(|e| e.to_string()),
        },
        presence: state.registry().stats(),
        logging: LoggingStatus {
            dropped: state.sink.dropped(),
        },
        timestamp: Timestamp::now().to_rfc3339(),
    };

    let status = if reachable {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

/// Fallback for unknown routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(ErrorCode::NotFound.as_str(), "Route not found")),
    )
}
