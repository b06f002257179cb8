//! gembot Responder
//!
//! Adapter between chat sessions and the Gemini generative-text backend:
//! issues the call with the primary model, retries once with the fallback
//! model, and sanitizes the raw reply into plain text.

pub mod error;
pub mod gemini;
pub mod responder;
pub mod sanitize;

pub use error::{CallFailure, GenerateError, Result};
pub use gemini::{GeminiClient, DEFAULT_BASE_URL};
pub use responder::{
    GeminiResponder, Responder, ResponderConfig, DEFAULT_FALLBACK_MODEL, DEFAULT_PRIMARY_MODEL,
    DEFAULT_TIMEOUT_SECS,
};
pub use sanitize::clean_reply;
