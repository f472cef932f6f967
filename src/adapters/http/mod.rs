//! HTTP adapters - REST API implementations.
//!
//! - [`presence`] - Read-only presence queries
//! - [`health`] - Root greeting and health probe
//! - [`middleware`] - CORS, rate limiting, request logging
//! - [`router`] - Assembles everything into one axum `Router`

pub mod error;
pub mod health;
pub mod middleware;
pub mod presence;
pub mod router;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use router::build_router;
pub use state::AppState;
