//! Per-connection session loop.
//!
//! One task owns one WebSocket from upgrade to termination: read a frame,
//! obtain a reply from the [`Responder`], write the reply, repeat. Sessions
//! share nothing mutable; the responder handle is the only shared resource
//! and it is read-only.
//!
//! Request/response pairing is strict 1:1: every successfully read message
//! produces exactly one outbound message (a genuine reply or the fixed
//! apology) before the next read is attempted.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use tracing::{debug, info, warn};

use gembot_responder::Responder;

use crate::message::ChatMessage;

/// Why a session loop terminated.
///
/// Generation failures never appear here: they degrade to the apology reply
/// and keep the session alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The client sent a close frame.
    ClientClosed,
    /// The underlying stream ended without a close frame.
    StreamEnded,
    /// A transport-level read failure.
    ReadError(String),
    /// An inbound frame that did not deserialize into a chat message.
    MalformedFrame(String),
    /// A transport-level write failure.
    WriteError,
}

impl std::fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClientClosed => write!(f, "client closed"),
            Self::StreamEnded => write!(f, "stream ended"),
            Self::ReadError(message) => write!(f, "read error: {message}"),
            Self::MalformedFrame(message) => write!(f, "malformed frame: {message}"),
            Self::WriteError => write!(f, "write error"),
        }
    }
}

/// Drives one client connection for its entire lifetime.
///
/// Invoked once per successfully upgraded connection; takes ownership of the
/// socket and returns only when the session is over. The socket is closed on
/// drop.
pub async fn handle_socket(mut socket: WebSocket, responder: Arc<dyn Responder>) {
    info!("New client connected");
    let end = drive_session(&mut socket, responder.as_ref()).await;
    info!(reason = %end, "Client disconnected");
}

/// The read -> generate -> write loop. Returns the termination reason.
async fn drive_session(socket: &mut WebSocket, responder: &dyn Responder) -> SessionEnd {
    loop {
        // Block until a full inbound frame is available.
        let frame = match socket.recv().await {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(_))) => return SessionEnd::ClientClosed,
            Some(Ok(Message::Ping(data))) => {
                if socket.send(Message::Pong(data)).await.is_err() {
                    return SessionEnd::WriteError;
                }
                continue;
            }
            Some(Ok(Message::Pong(_))) => continue,
            Some(Ok(Message::Binary(_))) => {
                // The wire protocol is JSON text frames only.
                debug!("Ignoring binary frame");
                continue;
            }
            Some(Err(e)) => {
                warn!(error = %e, "WebSocket read error");
                return SessionEnd::ReadError(e.to_string());
            }
            None => return SessionEnd::StreamEnded,
        };

        // A frame that does not decode is terminal: no retry, no partial
        // recovery.
        let inbound: ChatMessage = match serde_json::from_str(&frame) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(error = %e, "Malformed inbound frame, closing session");
                return SessionEnd::MalformedFrame(e.to_string());
            }
        };

        debug!(
            username = %inbound.username,
            content_len = inbound.content.len(),
            "Received message"
        );

        // Generation failures degrade to the fixed apology; the session
        // itself never terminates on a responder failure.
        let outbound = match responder.generate(&inbound.content).await {
            Ok(reply) => ChatMessage::from_bot(reply),
            Err(e) => {
                warn!(error = %e, "Reply generation failed, substituting apology");
                ChatMessage::apology()
            }
        };
        let json = match serde_json::to_string(&outbound) {
            Ok(json) => json,
            Err(e) => {
                // Serializing two plain strings cannot realistically fail,
                // but a lost frame must still end the session cleanly.
                warn!(error = %e, "Failed to serialize outbound message");
                return SessionEnd::WriteError;
            }
        };

        if let Err(e) = socket.send(Message::Text(json)).await {
            warn!(error = %e, "WebSocket write error");
            return SessionEnd::WriteError;
        }
    }
}
