//! PostgreSQL adapters.
//!
//! - `Database` - Connection pool with health probes and an ad-hoc statement
//!   path guarded by `screen_statement`

mod database;

pub use database::{screen_statement, Database, StatementScreen};
