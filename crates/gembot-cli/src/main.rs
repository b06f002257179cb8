//! gembot CLI
//!
//! Main entry point for the chat relay: loads the environment and
//! configuration, constructs the Gemini responder, and serves the HTTP and
//! WebSocket endpoints.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use gembot_responder::GeminiResponder;
use gembot_server::{create_router, AppState, ServerConfig};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the Gemini API key.
const API_KEY_VAR: &str = "API_KEY";

/// gembot - Gemini chat relay
///
/// Serves a static chat frontend and relays WebSocket messages to the
/// Gemini API, with automatic model fallback.
#[derive(Parser, Debug)]
#[command(name = "gembot")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: gembot.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory of static frontend files (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    static_dir: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing subscriber with appropriate filter
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run_server(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Loads configuration and credentials, then serves until interrupted.
async fn run_server(args: Args) -> anyhow::Result<()> {
    // .env is optional; system environment variables take over without it.
    if dotenvy::dotenv().is_err() {
        tracing::info!("No .env file found, using system environment variables");
    }

    let mut config = match args.config {
        Some(ref path) => ServerConfig::load_from_file(path)?,
        None => ServerConfig::load()?,
    };

    // Apply CLI argument overrides
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(ref static_dir) = args.static_dir {
        config.static_dir.clone_from(static_dir);
    }
    config.validate()?;

    // A missing credential is a deployment defect; refuse to serve at all
    // rather than apologize to every client.
    let api_key = std::env::var(API_KEY_VAR).unwrap_or_default();
    let responder = GeminiResponder::new(&api_key, config.responder_config())?;

    tracing::info!(
        port = config.port,
        static_dir = %config.static_dir,
        primary_model = %config.primary_model,
        fallback_model = %config.fallback_model,
        "Starting gembot server"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config, Arc::new(responder));
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, router).await?;

    Ok(())
}
