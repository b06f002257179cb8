//! Gemini generateContent wire client.
//!
//! Minimal text-only client for the Google Gemini API:
//! - Model goes in the URL path, not the request body
//! - Auth via `x-goog-api-key` header (not `Authorization: Bearer`)
//! - Response text lives in `candidates[0].content.parts[]`
//!
//! One invocation makes exactly one HTTP request; the model fallback in
//! [`crate::GeminiResponder`] is the only retry mechanism.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CallFailure;

/// Default base URL for the Gemini API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// HTTP client for the Gemini generateContent endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

// ============================================================================
// Wire Types
// ============================================================================

/// Top-level Gemini API request body.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

/// A content entry (one conversational turn).
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

/// A part within a content entry. Only text parts are relayed; anything
/// else the API might return deserializes to a part with no text.
#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// Top-level Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

/// One alternative reply for a single prompt.
#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

/// Gemini API error response body.
#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

// ============================================================================
// Client
// ============================================================================

impl GeminiClient {
    /// Creates a new client for the given API key and base URL.
    ///
    /// Key validity is not checked here; an invalid key surfaces as an
    /// API-status failure on the first call.
    #[must_use]
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Sends one prompt to one model and returns the raw reply text.
    ///
    /// # Errors
    ///
    /// Returns a [`CallFailure`] describing the transport error, API
    /// rejection, undecodable body, or missing candidate content.
    pub async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
    ) -> std::result::Result<String, CallFailure> {
        let url = format!("{}/v1beta/models/{model}:generateContent", self.base_url);
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        debug!(url = %url, "Sending Gemini API request");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(CallFailure::network)?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CallFailure::Api { status, message });
        }

        let body = resp.text().await.map_err(CallFailure::network)?;
        let response: GeminiResponse =
            serde_json::from_str(&body).map_err(CallFailure::decode)?;

        extract_reply(response)
    }
}

/// Pulls the reply text out of the first candidate.
///
/// Zero candidates, a candidate without content, or whitespace-only text all
/// count as [`CallFailure::NoContent`] so the caller can fall back.
fn extract_reply(response: GeminiResponse) -> std::result::Result<String, CallFailure> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(CallFailure::NoContent)?;
    let content = candidate.content.ok_or(CallFailure::NoContent)?;

    let text: String = content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.trim().is_empty() {
        return Err(CallFailure::NoContent);
    }
    Ok(text)
}
