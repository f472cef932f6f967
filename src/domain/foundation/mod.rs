//! Foundation module - Shared domain primitives.
//!
//! Contains the identifiers, timestamps and error types that form the
//! vocabulary of the presence domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{ConnectionHandle, Identity};
pub use timestamp::Timestamp;
