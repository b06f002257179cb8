//! gembot Server
//!
//! WebSocket chat relay: per-connection session loops, the HTTP router with
//! static frontend serving, and server configuration.

pub mod config;
pub mod error;
pub mod message;
pub mod router;
pub mod session;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use message::{ChatMessage, APOLOGY, BOT_USERNAME};
pub use router::{create_router, ws_handler, AppState};
pub use session::{handle_socket, SessionEnd};
