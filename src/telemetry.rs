//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `server.log_level`. An unparsable `log_level` falls
/// back to `info`. Call once, before anything logs.
pub fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if config.json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
