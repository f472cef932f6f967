//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;

use minimarket_server::adapters::http::{build_router, AppState};
use minimarket_server::adapters::identity::IdentityMode;
use minimarket_server::adapters::presence::InMemoryConnectionRegistry;
use minimarket_server::adapters::rate_limiter::InMemoryRateLimiter;
use minimarket_server::application::ConnectionLifecycle;
use minimarket_server::config::{RateLimitConfig, ServerConfig};
use minimarket_server::ports::{
    ConnectionRegistry, DatabaseError, DatabaseHealth, LogLevel, LogSink, PoolStats,
};

/// Sink that keeps every event in memory.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(LogLevel, String)>>,
    /// Reported through `LogSink::dropped`.
    pub dropped: AtomicU64,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<(LogLevel, String)> {
        self.events.lock().unwrap().clone()
    }

    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

impl LogSink for RecordingSink {
    fn notify(&self, level: LogLevel, message: &str) {
        self.events.lock().unwrap().push((level, message.to_string()));
    }

    fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::SeqCst)
    }
}

/// Database probe with a switchable outcome.
pub struct StubDatabase {
    pub reachable: AtomicBool,
}

impl StubDatabase {
    pub fn new(reachable: bool) -> Self {
        Self {
            reachable: AtomicBool::new(reachable),
        }
    }
}

#[async_trait]
impl DatabaseHealth for StubDatabase {
    async fn ping(&self) -> Result<(), DatabaseError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DatabaseError::Unavailable("connection refused".to_string()))
        }
    }

    fn pool_stats(&self) -> PoolStats {
        PoolStats {
            size: 2,
            idle: 1,
            max: 20,
        }
    }
}

/// Everything a test needs to drive and observe the app.
pub struct TestApp {
    pub router: Router,
    pub registry: Arc<dyn ConnectionRegistry>,
    pub lifecycle: ConnectionLifecycle,
    pub sink: Arc<RecordingSink>,
    pub database: Arc<StubDatabase>,
    pub shutdown: watch::Sender<bool>,
}

pub struct TestAppBuilder {
    identity_mode: IdentityMode,
    rate_limit: RateLimitConfig,
    reachable: bool,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            identity_mode: IdentityMode::Claimed,
            rate_limit: RateLimitConfig::default(),
            reachable: true,
        }
    }
}

impl TestAppBuilder {
    pub fn identity_mode(mut self, mode: IdentityMode) -> Self {
        self.identity_mode = mode;
        self
    }

    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = config;
        self
    }

    pub fn database_reachable(mut self, reachable: bool) -> Self {
        self.reachable = reachable;
        self
    }

    pub fn build(self) -> TestApp {
        let registry: Arc<dyn ConnectionRegistry> = Arc::new(InMemoryConnectionRegistry::new());
        let sink = Arc::new(RecordingSink::default());
        let database = Arc::new(StubDatabase::new(self.reachable));
        let lifecycle = ConnectionLifecycle::new(
            registry.clone(),
            self.identity_mode.resolver(),
            sink.clone(),
        );
        let (shutdown, shutdown_rx) = watch::channel(false);

        let state = AppState {
            lifecycle: lifecycle.clone(),
            database: database.clone(),
            rate_limiter: Arc::new(InMemoryRateLimiter::new(self.rate_limit.clone())),
            sink: sink.clone(),
            shutdown: shutdown_rx,
        };
        let router = build_router(state, &ServerConfig::default(), &self.rate_limit);

        TestApp {
            router,
            registry,
            lifecycle,
            sink,
            database,
            shutdown,
        }
    }
}

/// Serve the router on an ephemeral port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    addr
}

/// Poll until `condition` holds or two seconds pass.
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
