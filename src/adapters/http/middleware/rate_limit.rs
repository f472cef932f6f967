//! Request throttling middleware.
//!
//! Every request is counted against the bucket of its client IP and then
//! against the global bucket. The first full bucket answers `429` with the
//! denial message and a `Retry-After` header. Requests that pass carry the
//! IP bucket's quota in `X-RateLimit-Limit`, `X-RateLimit-Remaining` and
//! `X-RateLimit-Reset`.
//!
//! ```ignore
//! let limiter: Arc<dyn RateLimiter> = Arc::new(InMemoryRateLimiter::with_defaults());
//! let app = Router::new()
//!     .route("/api/presence", get(list_presence))
//!     .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
//! ```

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::ErrorCode;
use crate::ports::{RateLimitDenied, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter};

use super::super::error::ErrorResponse;

/// Rate limiter middleware state.
pub type RateLimiterState = Arc<dyn RateLimiter>;

static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Throttle by per-IP and global quota. Limiter errors let the request through.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiterState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let client_ip = client_ip(request.headers(), connect_info.map(|ConnectInfo(addr)| addr));

    // The IP bucket goes first so that requests it refuses never draw on the
    // shared global quota.
    let mut keys: Vec<RateLimitKey> = client_ip
        .map(|ip| RateLimitKey::ip(&ip.to_string()))
        .into_iter()
        .collect();
    keys.push(RateLimitKey::global());

    let mut ip_status = None;
    for key in &keys {
        match limiter.check(key).await {
            Ok(RateLimitResult::Denied(denied)) => return too_many_requests(&denied),
            Ok(RateLimitResult::Allowed(status)) => {
                if matches!(key, RateLimitKey::Ip(_)) {
                    ip_status = Some(status);
                }
            }
            Err(e) => tracing::warn!(key = %key, "Rate limiter unavailable, allowing request: {}", e),
        }
    }

    let mut response = next.run(request).await;
    if let Some(status) = ip_status {
        insert_quota_headers(response.headers_mut(), &status);
    }
    response
}

/// Client address: first `X-Forwarded-For` hop, then `X-Real-IP`, then the
/// socket peer. Header values that are not IP addresses are ignored.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<IpAddr> {
    header_ip(headers, "x-forwarded-for")
        .or_else(|| header_ip(headers, "x-real-ip"))
        .or_else(|| peer.map(|addr| addr.ip()))
}

/// First comma-separated entry of `name`, if it parses as an IP.
fn header_ip(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    let value = headers.get(name)?.to_str().ok()?;
    value.split(',').next()?.trim().parse().ok()
}

fn too_many_requests(denied: &RateLimitDenied) -> Response {
    let body = ErrorResponse::new(ErrorCode::RateLimited.as_str(), denied.message.clone());
    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    let headers = response.headers_mut();
    headers.insert(RETRY_AFTER, HeaderValue::from(denied.retry_after_secs));
    headers.insert(X_RATELIMIT_LIMIT.clone(), HeaderValue::from(denied.limit));
    headers.insert(X_RATELIMIT_REMAINING.clone(), HeaderValue::from(0u32));
    response
}

fn insert_quota_headers(headers: &mut HeaderMap, status: &RateLimitStatus) {
    headers.insert(X_RATELIMIT_LIMIT.clone(), HeaderValue::from(status.limit));
    headers.insert(X_RATELIMIT_REMAINING.clone(), HeaderValue::from(status.remaining));
    headers.insert(
        X_RATELIMIT_RESET.clone(),
        HeaderValue::from(status.reset_at.as_unix_secs()),
    );
}
