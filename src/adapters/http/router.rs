//! Top-level HTTP router.
//!
//! ```text
//! GET /                        welcome text
//! GET /health                  database + presence health
//! GET /api/presence            presence snapshot
//! GET /api/presence/:identity  one identity's handles
//! GET /ws                      realtime presence socket
//! ```
//!
//! Layers, outermost first: request id, CORS, timeout, request log, rate limit.

use axum::{middleware, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;

use crate::adapters::websocket::websocket_router;
use crate::config::{RateLimitConfig, ServerConfig};

use super::health::{health, not_found, welcome};
use super::middleware::{cors_layer, rate_limit_middleware, request_log_middleware};
use super::presence::presence_router;
use super::state::AppState;

/// Build the complete application router.
pub fn build_router(state: AppState, server: &ServerConfig, rate_limit: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .nest("/api", presence_router())
        .merge(websocket_router())
        .fallback(not_found);

    let router = if rate_limit.enabled {
        router.layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ))
    } else {
        router
    };

    router
        .layer(middleware::from_fn_with_state(
            state.sink.clone(),
            request_log_middleware,
        ))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
