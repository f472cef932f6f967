//! Domain layer containing presence types and shared primitives.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (identifiers, timestamps, errors)
//! - `presence` - Registry outcomes, snapshots and connection lifecycle vocabulary

pub mod foundation;
pub mod presence;
