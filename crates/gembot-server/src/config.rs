//! Server configuration.
//!
//! Loaded from `gembot.json` when present, with serde defaults for every
//! field so a missing file yields a fully working configuration. The API
//! credential is deliberately NOT part of this structure; it comes from the
//! process environment and never touches disk alongside the config.

use std::path::Path;
use std::time::Duration;

use gembot_responder::{ResponderConfig, DEFAULT_FALLBACK_MODEL, DEFAULT_PRIMARY_MODEL};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServerError};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "gembot.json";

/// Default port for the HTTP/WebSocket server.
const fn default_port() -> u16 {
    8080
}

/// Default directory served as the chat frontend.
fn default_static_dir() -> String {
    "static".to_string()
}

/// Default primary model identifier.
fn default_primary_model() -> String {
    DEFAULT_PRIMARY_MODEL.to_string()
}

/// Default fallback model identifier.
fn default_fallback_model() -> String {
    DEFAULT_FALLBACK_MODEL.to_string()
}

/// Default per-call backend timeout in seconds.
const fn default_request_timeout_secs() -> u64 {
    gembot_responder::DEFAULT_TIMEOUT_SECS
}

/// Main configuration for the gembot server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory of static frontend files served at `/`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Model tried first for every prompt.
    #[serde(default = "default_primary_model")]
    pub primary_model: String,

    /// Model tried once when the primary call fails.
    #[serde(default = "default_fallback_model")]
    pub fallback_model: String,

    /// Per-call backend timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
            primary_model: default_primary_model(),
            fallback_model: default_fallback_model(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from `gembot.json` in the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON or
    /// invalid values.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            ServerError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_file(&current_dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::ConfigParseError` if the file exists but
    /// contains invalid JSON, or `ServerError::ConfigValidationError` if the
    /// values are invalid.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(ServerError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ServerError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(ServerError::config_validation(
                "requestTimeoutSecs must be greater than 0",
                "Set requestTimeoutSecs to at least 1 second in your gembot.json",
            ));
        }

        if self.primary_model.trim().is_empty() {
            return Err(ServerError::config_validation(
                "primaryModel must not be empty",
                "Provide a valid model identifier in your gembot.json",
            ));
        }

        if self.fallback_model.trim().is_empty() {
            return Err(ServerError::config_validation(
                "fallbackModel must not be empty",
                "Provide a valid model identifier in your gembot.json",
            ));
        }

        if self.static_dir.trim().is_empty() {
            return Err(ServerError::config_validation(
                "staticDir must not be empty",
                "Provide a valid directory path in your gembot.json (use '.' for current directory)",
            ));
        }

        Ok(())
    }

    /// Builds the backend call configuration from this server configuration.
    #[must_use]
    pub fn responder_config(&self) -> ResponderConfig {
        ResponderConfig {
            primary_model: self.primary_model.clone(),
            fallback_model: self.fallback_model.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
