//! Chat message wire type.
//!
//! One `ChatMessage` per WebSocket text frame, in both directions:
//!
//! ```text
//! Client -> Server: { "username": "<string>", "content": "<string>" }
//! Server -> Client: { "username": "Gemini Bot", "content": "<string>" }
//! ```
//!
//! Messages are created fresh per exchange and never persisted; arrival
//! order on the channel is the only ordering.

use serde::{Deserialize, Serialize};

/// Username stamped on every outbound reply.
pub const BOT_USERNAME: &str = "Gemini Bot";

/// Fixed reply content when no genuine reply could be generated.
pub const APOLOGY: &str = "Sorry, I couldn't generate a response.";

/// The unit of exchange on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Display name of the sender.
    pub username: String,
    /// The message text.
    pub content: String,
}

impl ChatMessage {
    /// Creates an outbound bot message with the given content.
    #[must_use]
    pub fn from_bot(content: impl Into<String>) -> Self {
        Self {
            username: BOT_USERNAME.to_string(),
            content: content.into(),
        }
    }

    /// Creates the fixed apology reply used when generation fails.
    #[must_use]
    pub fn apology() -> Self {
        Self::from_bot(APOLOGY)
    }
}
