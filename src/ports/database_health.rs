//! DatabaseHealth port - What the HTTP layer needs to know about the pool.
//!
//! The presence core does not touch the database. The server exposes pool
//! reachability and sizing on its health route, and this port keeps that
//! route testable without a running Postgres.

use async_trait::async_trait;
use serde::Serialize;

/// Snapshot of connection pool sizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Connections currently open (idle + in use).
    pub size: u32,
    /// Connections idle in the pool.
    pub idle: usize,
    /// Configured upper bound.
    pub max: u32,
}

/// Errors reported by database health probes.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Could not reach the database.
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    /// Query failed after the connection was acquired.
    #[error("Query failed: {0}")]
    Query(String),

    /// Statement was refused before execution.
    #[error("Statement rejected: {0}")]
    Rejected(String),
}

/// Port for probing the relational database pool.
#[async_trait]
pub trait DatabaseHealth: Send + Sync {
    /// Round-trip a trivial query.
    async fn ping(&self) -> Result<(), DatabaseError>;

    /// Current pool sizing.
    fn pool_stats(&self) -> PoolStats;
}
