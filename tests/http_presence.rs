//! Integration tests for the HTTP surface.
//!
//! Routes are exercised through `tower::ServiceExt::oneshot` against the
//! fully layered router, with a stub database probe.

mod common;

use std::sync::atomic::Ordering;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use minimarket_server::config::RateLimitConfig;
use minimarket_server::domain::foundation::{ConnectionHandle, Identity};
use minimarket_server::ports::{ConnectContext, LogLevel};

use common::TestAppBuilder;

async fn get(router: &axum::Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn get_json(router: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(router, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn handle(value: &str) -> ConnectionHandle {
    ConnectionHandle::new(value).unwrap()
}

#[tokio::test]
async fn root_returns_welcome_text() {
    let app = TestAppBuilder::default().build();

    let (status, _, body) = get(&app.router, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Welcome to MiniMarket API");
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let app = TestAppBuilder::default().build();

    let (status, json) = get_json(&app.router, "/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn presence_lists_registered_connections() {
    let app = TestAppBuilder::default().build();
    let _a1 = app
        .lifecycle
        .on_connect(ConnectContext::new(handle("a1")).with_claimed_identity("alice"));
    let _a2 = app
        .lifecycle
        .on_connect(ConnectContext::new(handle("a2")).with_claimed_identity("alice"));
    let _b1 = app
        .lifecycle
        .on_connect(ConnectContext::new(handle("b1")).with_claimed_identity("bob"));

    let (status, json) = get_json(&app.router, "/api/presence").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["identityCount"], 2);
    assert_eq!(json["connectionCount"], 3);
    assert_eq!(json["online"][0]["identity"], "alice");
    assert_eq!(json["online"][0]["handles"], serde_json::json!(["a1", "a2"]));
    assert_eq!(json["online"][1]["identity"], "bob");
}

#[tokio::test]
async fn presence_reflects_disconnects() {
    let app = TestAppBuilder::default().build();
    let connection = app
        .lifecycle
        .on_connect(ConnectContext::new(handle("a1")).with_claimed_identity("alice"));

    let (_, before) = get_json(&app.router, "/api/presence/alice").await;
    assert_eq!(before["online"], true);
    assert_eq!(before["handles"], serde_json::json!(["a1"]));

    drop(connection);

    let (status, after) = get_json(&app.router, "/api/presence/alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["identity"], "alice");
    assert_eq!(after["online"], false);
    assert_eq!(after["handles"], serde_json::json!([]));

    let (_, all) = get_json(&app.router, "/api/presence").await;
    assert_eq!(all["online"], serde_json::json!([]));
}

#[tokio::test]
async fn health_reports_pool_and_presence() {
    let app = TestAppBuilder::default().build();
    app.registry
        .register(&Identity::new("alice").unwrap(), &handle("h1"));

    let (status, json) = get_json(&app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["database"]["reachable"], true);
    assert_eq!(json["database"]["pool"]["max"], 20);
    assert_eq!(json["presence"]["identities"], 1);
    assert_eq!(json["presence"]["connections"], 1);
    assert_eq!(json["logging"]["dropped"], 0);
}

#[tokio::test]
async fn health_reports_lost_log_records() {
    let app = TestAppBuilder::default().build();
    app.sink.dropped.store(7, Ordering::SeqCst);

    let (status, json) = get_json(&app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["logging"]["dropped"], 7);
}

#[tokio::test]
async fn health_is_503_when_database_unreachable() {
    let app = TestAppBuilder::default().database_reachable(false).build();

    let (status, json) = get_json(&app.router, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["database"]["reachable"], false);

    app.database.reachable.store(true, Ordering::SeqCst);
    let (status, _) = get_json(&app.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn every_request_is_logged_at_http_level() {
    let app = TestAppBuilder::default().build();

    get(&app.router, "/").await;
    get(&app.router, "/api/presence").await;

    let lines = app.sink.messages_at(LogLevel::Http);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("GET / - 200 ("));
    assert!(lines[1].starts_with("GET /api/presence - 200 ("));
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestAppBuilder::default().build();

    let (_, headers, _) = get(&app.router, "/").await;

    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn rate_limit_returns_429_with_source_message() {
    let app = TestAppBuilder::default()
        .rate_limit(RateLimitConfig {
            max_requests: 3,
            ..Default::default()
        })
        .build();

    let request = || {
        Request::builder()
            .uri("/")
            .header("X-Forwarded-For", "203.0.113.9")
            .body(Body::empty())
            .unwrap()
    };

    for _ in 0..3 {
        let response = app.router.clone().oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.router.clone().oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "RATE_LIMITED");
    assert_eq!(
        json["message"],
        "Too many requests from this IP, please try again after 10 minutes"
    );

    // Denials are still logged.
    let lines = app.sink.messages_at(LogLevel::Http);
    assert!(lines.last().unwrap().starts_with("GET / - 429 ("));
}

#[tokio::test]
async fn disabled_rate_limit_never_denies() {
    let app = TestAppBuilder::default()
        .rate_limit(RateLimitConfig {
            enabled: false,
            max_requests: 1,
            ..Default::default()
        })
        .build();

    for _ in 0..5 {
        let (status, _, _) = get(&app.router, "/").await;
        assert_eq!(status, StatusCode::OK);
    }
}
