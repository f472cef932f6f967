//! WebSocket adapter for realtime presence.
//!
//! Each accepted socket becomes one registered connection for as long as it
//! stays open.
//!
//! ```text
//!  client ──upgrade──► ws_handler ──► ConnectionLifecycle::on_connect
//!                          │                     │
//!                          │ frames              ▼
//!                          ├── ping ──────► pong
//!                          ├── presence.request ──► registry snapshot
//!                          └── close / shutdown ──► on_disconnect
//! ```
//!
//! # Components
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod handler;
pub mod messages;

pub use handler::{reply_to_text, websocket_router, ws_handler, ConnectParams, WebSocketState};
pub use messages::{
    ClientMessage, ConnectedMessage, ErrorMessage, PongMessage, PresenceMessage, ServerMessage,
};
