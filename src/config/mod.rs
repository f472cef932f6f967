//! Typed server configuration.
//!
//! Values come from `MINIMARKET`-prefixed environment variables, with `__`
//! between nesting levels, after an optional `.env` file has been applied.
//! Only the `database` section is mandatory.
//!
//! ```no_run
//! use minimarket_server::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod database;
mod error;
mod presence;
mod rate_limit;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use presence::PresenceConfig;
pub use rate_limit::RateLimitConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Environment variable prefix, e.g. `MINIMARKET__SERVER__PORT`.
const ENV_PREFIX: &str = "MINIMARKET";
const ENV_SEPARATOR: &str = "__";

/// Root configuration, one field per section.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub presence: PresenceConfig,
}

impl AppConfig {
    /// Load from the process environment, reading `.env` first if present.
    ///
    /// `MINIMARKET__DATABASE__HOST=db` sets `database.host`. Fails when the
    /// database section is absent or a value does not parse.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_environment(config::Environment::default())
    }

    /// Load from an explicit environment source.
    fn from_environment(source: config::Environment) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(source.prefix(ENV_PREFIX).separator(ENV_SEPARATOR))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Check every section. The first failure wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.rate_limit.validate()?;
        self.presence.validate()
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
