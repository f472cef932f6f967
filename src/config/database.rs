//! PostgreSQL pool settings.

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound on `max_connections`.
const MAX_POOL_SIZE: u32 = 100;

/// Where the pool connects and how it is sized.
///
/// The server is addressed by discrete `host`/`port`/`name`/`user`/`password`
/// values, never by a single URL. The section itself is required; within it
/// only `host`, `name` and `user` lack usable defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    /// Database to open on the server.
    pub name: String,
    /// Role to log in as.
    pub user: String,
    /// Omitted for trust or peer authentication.
    pub password: Option<SecretString>,

    pub min_connections: u32,
    pub max_connections: u32,

    /// Seconds to wait for a free pooled connection.
    pub acquire_timeout_secs: u64,
    /// Seconds before an idle connection is closed.
    pub idle_timeout_secs: u64,
    /// Seconds before any connection is recycled.
    pub max_lifetime_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 5432,
            name: String::new(),
            user: String::new(),
            password: None,
            min_connections: 1,
            max_connections: 20,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 30,
            max_lifetime_secs: 1800,
        }
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.host, "DATABASE__HOST")?;
        require(&self.name, "DATABASE__NAME")?;
        require(&self.user, "DATABASE__USER")?;

        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        if self.max_connections == 0 || self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        Ok(())
    }
}

fn require(value: &str, variable: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingRequired(variable))
    } else {
        Ok(())
    }
}
