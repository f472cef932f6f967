//! MiniMarket server binary.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;

use minimarket_server::adapters::http::{build_router, AppState};
use minimarket_server::adapters::logging::{BufferedLogSink, TracingLogSink};
use minimarket_server::adapters::postgres::Database;
use minimarket_server::adapters::presence::InMemoryConnectionRegistry;
use minimarket_server::adapters::rate_limiter::InMemoryRateLimiter;
use minimarket_server::application::ConnectionLifecycle;
use minimarket_server::config::{AppConfig, ConfigError};
use minimarket_server::ports::{DatabaseError, LogLevel, LogSink};
use minimarket_server::telemetry;

/// How long to wait for queued log records after the server stops.
const LOG_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Fatal startup and serve errors.
#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = AppConfig::load()?;
    config.validate().map_err(ConfigError::from)?;

    telemetry::init_tracing(&config.server);
    tracing::info!(
        "MiniMarket server v{} starting ({:?})",
        env!("CARGO_PKG_VERSION"),
        config.server.environment
    );

    let (buffered, log_drain) = BufferedLogSink::spawn(
        Arc::new(TracingLogSink),
        config.presence.log_buffer_capacity,
    );
    let sink: Arc<dyn LogSink> = Arc::new(buffered.clone());

    let database = Arc::new(Database::connect(&config.database, sink.clone()).await?);

    let lifecycle = ConnectionLifecycle::new(
        Arc::new(InMemoryConnectionRegistry::new()),
        config.presence.identity_mode.resolver(),
        sink.clone(),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let state = AppState {
        lifecycle,
        database: database.clone(),
        rate_limiter: Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())),
        sink: sink.clone(),
        shutdown: shutdown_rx,
    };
    let app = build_router(state, &config.server, &config.rate_limit);

    let addr = config.server.socket_addr().map_err(ConfigError::from)?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    sink.notify(LogLevel::Socket, "WebSocket server is running");
    sink.notify(
        LogLevel::Info,
        &format!("Server running on port {}", config.server.port),
    );

    let serve_result = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, closing realtime connections");
        let _ = shutdown_tx.send(true);
    })
    .await;

    database.close().await;
    sink.notify(LogLevel::Info, "Server stopped");

    let dropped = buffered.dropped();
    if dropped > 0 {
        tracing::warn!(dropped, "Log buffer overflowed, lifecycle records were lost");
    }

    // The drain task ends once every sink clone is gone.
    drop(sink);
    drop(buffered);
    drop(database);
    if tokio::time::timeout(LOG_DRAIN_TIMEOUT, log_drain).await.is_err() {
        tracing::warn!("Timed out flushing buffered log records");
    }

    serve_result.map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
