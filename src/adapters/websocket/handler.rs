//! WebSocket upgrade handler for the realtime presence endpoint.
//!
//! Handles the HTTP → WebSocket upgrade and drives one connection:
//! 1. Upgrade to WebSocket
//! 2. Register through the lifecycle and send a `connected` frame
//! 3. Answer client frames until the peer closes or the server shuts down
//! 4. Deregister exactly once

use std::net::SocketAddr;

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        ConnectInfo, FromRef, Query, State,
    },
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;
use tokio::sync::watch;

use crate::application::{ConnectionLifecycle, LiveConnection};
use crate::domain::foundation::{ConnectionHandle, ErrorCode};
use crate::domain::presence::DisconnectReason;
use crate::ports::ConnectContext;

use super::messages::{ClientMessage, ServerMessage};

/// Receive errors tolerated in a row before the connection is given up.
const MAX_CONSECUTIVE_RECV_ERRORS: u32 = 3;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub lifecycle: ConnectionLifecycle,
    /// Flips to `true` when the server begins shutting down.
    pub shutdown: watch::Receiver<bool>,
}

impl WebSocketState {
    pub fn new(lifecycle: ConnectionLifecycle, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            lifecycle,
            shutdown,
        }
    }
}

/// Query parameters accepted on upgrade.
#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    /// Identity the client claims. Only honoured in `claimed` identity mode.
    pub identity: Option<String>,
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws?identity=<optional>`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    peer: Option<ConnectInfo<SocketAddr>>,
    State(state): State<WebSocketState>,
) -> Response {
    let mut context = ConnectContext::new(ConnectionHandle::generate());
    if let Some(identity) = params.identity {
        context = context.with_claimed_identity(identity);
    }
    if let Some(ConnectInfo(addr)) = peer {
        context = context.with_remote_addr(addr);
    }

    ws.on_upgrade(move |socket| handle_socket(socket, context, state))
}

/// Handle an established WebSocket connection.
///
/// Runs for the lifetime of the connection. Every exit path goes through
/// `on_disconnect`; if the task is cancelled instead, dropping the
/// `LiveConnection` performs the deregistration.
async fn handle_socket(mut socket: WebSocket, context: ConnectContext, state: WebSocketState) {
    let lifecycle = state.lifecycle;
    let mut shutdown = state.shutdown;
    let connection = lifecycle.on_connect(context);

    if let Err(e) = send_message(&mut socket, &ServerMessage::connected(&connection)).await {
        tracing::debug!(handle = %connection.handle(), "Failed to send connected message: {}", e);
        lifecycle.on_disconnect(&connection, DisconnectReason::TransportError);
        return;
    }

    if *shutdown.borrow() {
        close_for_shutdown(&mut socket).await;
        lifecycle.on_disconnect(&connection, DisconnectReason::ServerShutdown);
        return;
    }

    let mut consecutive_errors = 0;
    let reason = loop {
        tokio::select! {
            changed = shutdown.changed() => {
                // A dropped sender also means the server is going away.
                if changed.is_err() || *shutdown.borrow() {
                    close_for_shutdown(&mut socket).await;
                    break DisconnectReason::ServerShutdown;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    None | Some(Ok(Message::Close(_))) => break DisconnectReason::ClientClosed,
                    Some(Ok(Message::Text(text))) => {
                        consecutive_errors = 0;
                        let reply = reply_to_text(&lifecycle, &connection, &text);
                        if let Err(e) = send_message(&mut socket, &reply).await {
                            tracing::debug!(handle = %connection.handle(), "Failed to send reply: {}", e);
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        consecutive_errors = 0;
                        let reply = report_error(
                            &lifecycle,
                            &connection,
                            ErrorCode::UnsupportedMessage,
                            "Binary frames are not supported",
                        );
                        let _ = send_message(&mut socket, &reply).await;
                    }
                    // Protocol-level ping/pong is answered by axum
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {}
                    Some(Err(e)) => {
                        let reply = report_error(
                            &lifecycle,
                            &connection,
                            ErrorCode::TransportError,
                            e.to_string(),
                        );
                        let _ = send_message(&mut socket, &reply).await;

                        consecutive_errors += 1;
                        if consecutive_errors >= MAX_CONSECUTIVE_RECV_ERRORS {
                            break DisconnectReason::TransportError;
                        }
                    }
                }
            }
        }
    };

    lifecycle.on_disconnect(&connection, reason);
}

/// Build the reply to one client text frame.
///
/// Malformed or unknown frames are reported through `on_error` and answered
/// with an error frame. The connection stays open either way.
pub fn reply_to_text(
    lifecycle: &ConnectionLifecycle,
    connection: &LiveConnection,
    text: &str,
) -> ServerMessage {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Ping) => ServerMessage::pong(),
        Ok(ClientMessage::PresenceRequest) => {
            ServerMessage::presence(lifecycle.registry().snapshot())
        }
        Err(e) => report_error(
            lifecycle,
            connection,
            ErrorCode::InvalidMessage,
            format!("Invalid message: {}", e),
        ),
    }
}

fn report_error(
    lifecycle: &ConnectionLifecycle,
    connection: &LiveConnection,
    code: ErrorCode,
    message: impl Into<String>,
) -> ServerMessage {
    let message = message.into();
    lifecycle.on_error(connection, &message);
    ServerMessage::error(code, message)
}

async fn close_for_shutdown(socket: &mut WebSocket) {
    let frame = CloseFrame {
        code: close_code::AWAY,
        reason: "server shutting down".into(),
    };
    let _ = socket.send(Message::Close(Some(frame))).await;
}

/// Send a JSON message over the WebSocket.
async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    socket.send(Message::Text(json)).await
}

/// Create axum router for the WebSocket endpoint.
///
/// Works under any application state that can hand out a [`WebSocketState`].
pub fn websocket_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    WebSocketState: FromRef<S>,
{
    Router::new().route("/ws", get(ws_handler))
}
