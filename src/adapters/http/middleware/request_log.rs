//! Request logging middleware.
//!
//! Emits `METHOD /path - STATUS (Nms)` through the log sink at `http` level
//! once the inner service has produced a response.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::ports::{LogLevel, LogSink};

/// Request log middleware state.
pub type RequestLogState = Arc<dyn LogSink>;

pub async fn request_log_middleware(
    State(sink): State<RequestLogState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    sink.notify(
        LogLevel::Http,
        &format_request_line(
            method.as_str(),
            &path,
            response.status().as_u16(),
            start.elapsed().as_millis(),
        ),
    );

    response
}

fn format_request_line(method: &str, path: &str, status: u16, elapsed_ms: u128) -> String {
    format!("{} {} - {} ({}ms)", method, path, status, elapsed_ms)
}
