//! HTTP router and WebSocket upgrade handling.
//!
//! The router exposes one dynamic endpoint, `GET /ws`, which upgrades to the
//! chat WebSocket; everything else falls through to static file serving for
//! the chat frontend. CORS is wide open, a development posture.

use std::sync::Arc;

use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

use gembot_responder::Responder;

use crate::config::ServerConfig;
use crate::session::handle_socket;

/// Shared application state for the HTTP server.
///
/// Both fields are read-only after construction and safely shared by every
/// connection task.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,
    /// The reply generator shared by all sessions.
    pub responder: Arc<dyn Responder>,
}

impl AppState {
    /// Creates a new `AppState` from a configuration and a responder.
    #[must_use]
    pub fn new(config: ServerConfig, responder: Arc<dyn Responder>) -> Self {
        Self { config, responder }
    }
}

/// Creates the HTTP router with the WebSocket endpoint and static serving.
///
/// # Arguments
///
/// * `state` - The shared application state
///
/// # Returns
///
/// An axum `Router` configured with:
/// - `GET /ws` for chat sessions
/// - Static file serving from the configured directory
/// - CORS middleware (allow all, development posture)
/// - Tracing middleware for request logging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/ws", get(ws_handler))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// WebSocket upgrade handler for `GET /ws`.
///
/// Spawns one session loop per successfully upgraded connection; the loop
/// owns the socket until termination.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    info!("New WebSocket connection request");
    let responder = Arc::clone(&state.responder);
    ws.on_upgrade(move |socket| handle_socket(socket, responder))
}
