//! JSON frames exchanged on `/ws`.
//!
//! Every frame is an object with a `type` tag. The server sends `connected`,
//! `presence`, `error` and `pong`; clients send `ping` and `presence.request`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ErrorCode, Timestamp};
use crate::domain::presence::{PresenceEntry, PresenceSnapshot};
use crate::application::LiveConnection;

// ─── Outbound ────────────────────────────────────────────────────

/// Frames written by the server.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection registered.
    Connected(ConnectedMessage),

    /// Current presence snapshot.
    Presence(PresenceMessage),

    /// A client frame was rejected or the transport misbehaved.
    Error(ErrorMessage),

    /// Heartbeat response.
    Pong(PongMessage),
}

impl ServerMessage {
    /// Greeting for a freshly registered connection.
    pub fn connected(connection: &LiveConnection) -> Self {
        ServerMessage::Connected(ConnectedMessage {
            handle: connection.handle().to_string(),
            identity: connection.identity().to_string(),
            timestamp: connection.connected_at().to_rfc3339(),
        })
    }

    pub fn presence(snapshot: PresenceSnapshot) -> Self {
        let timestamp = snapshot.taken_at().to_rfc3339();
        ServerMessage::Presence(PresenceMessage {
            online: snapshot.into_entries(),
            timestamp,
        })
    }

    pub fn pong() -> Self {
        ServerMessage::Pong(PongMessage {
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMessage::Error(ErrorMessage {
            code: code.as_str().to_string(),
            message: message.into(),
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }
}

/// Sent once the connection is registered.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectedMessage {
    pub handle: String,
    pub identity: String,
    pub timestamp: String,
}

/// Presence snapshot pushed on request.
#[derive(Debug, Clone, Serialize)]
pub struct PresenceMessage {
    pub online: Vec<PresenceEntry>,
    pub timestamp: String,
}

/// Rejection notice. The connection stays open.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    pub timestamp: String,
}

/// Heartbeat response.
#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

// ─── Inbound ─────────────────────────────────────────────────────

/// Frames accepted from clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Heartbeat request.
    Ping,

    /// Request the current presence snapshot.
    #[serde(rename = "presence.request")]
    PresenceRequest,
}
