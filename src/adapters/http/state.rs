//! Shared application state for HTTP and WebSocket routes.

use std::sync::Arc;

use axum::extract::FromRef;
use tokio::sync::watch;

use crate::adapters::websocket::WebSocketState;
use crate::application::ConnectionLifecycle;
use crate::ports::{ConnectionRegistry, DatabaseHealth, LogSink, RateLimiter};

/// Dependencies shared by every handler.
///
/// Cloned per request; all fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: ConnectionLifecycle,
    pub database: Arc<dyn DatabaseHealth>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub sink: Arc<dyn LogSink>,
    pub shutdown: watch::Receiver<bool>,
}

impl AppState {
    pub fn registry(&self) -> &Arc<dyn ConnectionRegistry> {
        self.lifecycle.registry()
    }
}

impl FromRef<AppState> for WebSocketState {
    fn from_ref(state: &AppState) -> Self {
        WebSocketState::new(state.lifecycle.clone(), state.shutdown.clone())
    }
}
