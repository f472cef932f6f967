//! PostgreSQL connection pool.
//!
//! Wraps a `PgPool` built from discrete connection settings and reports pool
//! events through the log sink at `db` level.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::ports::{DatabaseError, DatabaseHealth, LogLevel, LogSink, PoolStats};

/// Result of screening a statement before it is sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementScreen {
    /// Nothing suspicious found.
    Clean,
    /// Blank statement.
    Empty,
    /// Contains a comment marker or a `; drop` sequence.
    Suspicious,
}

/// Inspect a statement for patterns commonly seen in injected SQL.
///
/// Screening is advisory: suspicious statements are reported, not refused.
/// Callers must still bind untrusted values as parameters.
pub fn screen_statement(sql: &str) -> StatementScreen {
    if sql.trim().is_empty() {
        return StatementScreen::Empty;
    }
    if sql.contains("--") || has_chained_drop(sql) {
        return StatementScreen::Suspicious;
    }
    StatementScreen::Clean
}

/// Matches `;` followed by optional whitespace, `drop`, then whitespace.
fn has_chained_drop(sql: &str) -> bool {
    let lower = sql.to_ascii_lowercase();
    lower.match_indices(';').any(|(idx, _)| {
        let rest = lower[idx + 1..].trim_start();
        rest.strip_prefix("drop")
            .and_then(|after| after.chars().next())
            .is_some_and(char::is_whitespace)
    })
}

/// Shared PostgreSQL pool.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    max_connections: u32,
    sink: Arc<dyn LogSink>,
}

impl Database {
    /// Connect and verify the pool with a round trip.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Unavailable` if the server cannot be reached.
    pub async fn connect(
        config: &DatabaseConfig,
        sink: Arc<dyn LogSink>,
    ) -> Result<Self, DatabaseError> {
        tracing::debug!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            max = config.max_connections,
            min = config.min_connections,
            "Creating database pool"
        );

        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.name)
            .username(&config.user);
        if let Some(password) = &config.password {
            options = options.password(password.expose_secret());
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(config.idle_timeout())
            .max_lifetime(config.max_lifetime())
            .connect_with(options)
            .await
            .map_err(|e| {
                sink.notify(LogLevel::Error, &format!("Database connection failed: {}", e));
                DatabaseError::Unavailable(e.to_string())
            })?;

        let database = Self::from_pool(pool, config.max_connections, sink);
        database.ping().await?;
        database.sink.notify(
            LogLevel::Db,
            &format!("Connected to the {} database", config.name),
        );

        Ok(database)
    }

    /// Wrap an already built pool without touching the server.
    pub fn from_pool(pool: PgPool, max_connections: u32, sink: Arc<dyn LogSink>) -> Self {
        Self {
            pool,
            max_connections,
            sink,
        }
    }

    /// Underlying pool, for callers that run typed queries.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run an ad-hoc statement and return the affected row count.
    ///
    /// # Errors
    ///
    /// `Rejected` for blank statements, `Query` when the server fails it.
    pub async fn execute(&self, sql: &str) -> Result<u64, DatabaseError> {
        match screen_statement(sql) {
            StatementScreen::Empty => {
                self.sink
                    .notify(LogLevel::Error, "SQL statement is required");
                return Err(DatabaseError::Rejected(
                    "SQL statement is required".to_string(),
                ));
            }
            StatementScreen::Suspicious => {
                self.sink
                    .notify(LogLevel::Error, "Potentially dangerous SQL detected");
            }
            StatementScreen::Clean => {}
        }

        let result = sqlx::query(sql).execute(&self.pool).await.map_err(|e| {
            self.sink.notify(LogLevel::Error, &format!("Query failed: {}", e));
            DatabaseError::Query(e.to_string())
        })?;

        Ok(result.rows_affected())
    }

    /// Close every connection in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        self.sink.notify(LogLevel::Db, "Database connections closed");
    }
}

#[async_trait]
impl DatabaseHealth for Database {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseError::Unavailable(e.to_string()))
    }

    fn pool_stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
            max: self.max_connections,
        }
    }
}
