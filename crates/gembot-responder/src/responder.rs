//! Reply generation with two-tier model fallback.
//!
//! [`Responder`] is the seam between the session loop and the generative
//! backend: one prompt in, one clean reply out. The production
//! implementation, [`GeminiResponder`], tries the primary model first and
//! retries exactly once with the fallback model before giving up.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{CallFailure, GenerateError, Result};
use crate::gemini::{GeminiClient, DEFAULT_BASE_URL};
use crate::sanitize::clean_reply;

/// Default primary model identifier.
pub const DEFAULT_PRIMARY_MODEL: &str = "gemini-1.5-flash-latest";

/// Default fallback model identifier.
pub const DEFAULT_FALLBACK_MODEL: &str = "gemini-1.5-pro";

/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Turns a text prompt into a clean text reply.
///
/// Implementations are stateless per call and safely shared across all
/// concurrent sessions behind an `Arc`.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Generates a reply for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerateError`] when no usable reply could be produced;
    /// the caller decides how to degrade.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Backend call configuration: the ordered (primary, fallback) model pair
/// and the shared per-call timeout.
///
/// Immutable and process-wide; never tied to any session.
#[derive(Debug, Clone)]
pub struct ResponderConfig {
    /// Model tried first for every prompt.
    pub primary_model: String,
    /// Model tried once when the primary call fails.
    pub fallback_model: String,
    /// Timeout budget applied to each call. The fallback call gets a fresh
    /// window, not the remainder of the primary's.
    pub request_timeout: Duration,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            primary_model: DEFAULT_PRIMARY_MODEL.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// [`Responder`] backed by the Gemini generateContent API.
#[derive(Debug, Clone)]
pub struct GeminiResponder {
    client: GeminiClient,
    config: ResponderConfig,
}

impl GeminiResponder {
    /// Creates a responder for the given API key and configuration.
    ///
    /// The credential is validated eagerly: a missing or blank key is a
    /// deployment defect and fails here, before any session is served.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Configuration`] if the key is empty or
    /// whitespace-only.
    pub fn new(api_key: &str, config: ResponderConfig) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, config)
    }

    /// Creates a responder pointing at a custom API base URL.
    ///
    /// Used by tests to target a stub backend; behaves exactly like
    /// [`Self::new`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Configuration`] if the key is empty or
    /// whitespace-only.
    pub fn with_base_url(
        api_key: &str,
        base_url: impl Into<String>,
        config: ResponderConfig,
    ) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(GenerateError::configuration(
                "API_KEY not set in environment variables",
            ));
        }

        Ok(Self {
            client: GeminiClient::new(api_key, base_url),
            config,
        })
    }

    /// Makes one bounded call to one model.
    async fn attempt(&self, model: &str, prompt: &str) -> std::result::Result<String, CallFailure> {
        let budget = self.config.request_timeout;
        match tokio::time::timeout(budget, self.client.generate_content(model, prompt)).await {
            Ok(result) => result,
            Err(_) => Err(CallFailure::Timeout {
                secs: budget.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl Responder for GeminiResponder {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let raw = match self.attempt(&self.config.primary_model, prompt).await {
            Ok(raw) => raw,
            Err(primary) => {
                warn!(
                    model = %self.config.primary_model,
                    error = %primary,
                    "Primary model failed, switching to fallback"
                );
                match self.attempt(&self.config.fallback_model, prompt).await {
                    Ok(raw) => raw,
                    Err(fallback) => {
                        return Err(GenerateError::BackendCall { primary, fallback });
                    }
                }
            }
        };

        let reply = clean_reply(&raw);
        if reply.is_empty() {
            // Sanitation can strip a reply down to nothing; treat that the
            // same as a contentless response rather than relaying a blank.
            debug!(raw_len = raw.len(), "Reply sanitized to empty string");
            return Err(GenerateError::EmptyResponse);
        }

        Ok(reply)
    }
}
