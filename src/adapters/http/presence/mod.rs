//! HTTP adapter for presence queries.

mod dto;
mod handlers;
mod routes;

pub use dto::{IdentityPresenceResponse, PresenceResponse};
pub use handlers::{get_identity_presence, list_presence};
pub use routes::presence_router;
