//! Error types for reply generation.
//!
//! This module defines the failure taxonomy surfaced by [`crate::Responder`]
//! implementations: configuration defects, exhausted backend fallback, and
//! calls that succeed at the transport level but carry no usable content.

/// A specialized `Result` type for responder operations.
pub type Result<T> = std::result::Result<T, GenerateError>;

/// Errors surfaced by a single `generate` invocation.
///
/// All variants are terminal for that invocation; nothing is retried beyond
/// the one built-in fallback tier.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The backend credential is missing or unusable.
    ///
    /// This is a deployment defect, not a per-request condition. It is
    /// detected eagerly when the responder is constructed, before any
    /// session is served.
    #[error("Backend configuration error: {message}\n\nSuggestion: Set the API_KEY environment variable (or .env entry) to a valid Gemini API key")]
    Configuration {
        /// Description of the configuration defect.
        message: String,
    },

    /// Both the primary and the fallback model calls failed.
    ///
    /// Carries the per-tier causes so logs can distinguish a timeout from an
    /// API rejection from an empty result, even though the client-facing
    /// message stays generic.
    #[error("Backend call failed on both tiers: primary: {primary}; fallback: {fallback}")]
    BackendCall {
        /// Why the primary model call failed.
        primary: CallFailure,
        /// Why the fallback model call failed.
        fallback: CallFailure,
    },

    /// The call succeeded transport-wise but yielded no usable content.
    ///
    /// Raised when the reply text sanitizes down to the empty string.
    /// A reply that is empty before sanitation is a per-tier
    /// [`CallFailure::NoContent`] instead, so it still triggers the fallback.
    #[error("Backend returned no usable content")]
    EmptyResponse,
}

/// Why a single backend call (one tier) failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallFailure {
    /// The call did not complete within the per-call timeout budget.
    Timeout {
        /// The timeout budget in seconds.
        secs: u64,
    },
    /// The API returned a non-success status.
    Api {
        /// The HTTP status code.
        status: u16,
        /// The error message extracted from the response body.
        message: String,
    },
    /// The request could not be sent or the response body not read.
    Network {
        /// Description of the transport failure.
        message: String,
    },
    /// The response body was not valid Gemini JSON.
    Decode {
        /// Description of the decode failure.
        message: String,
    },
    /// The response carried zero candidates or a whitespace-only payload.
    NoContent,
}

impl std::fmt::Display for CallFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout { secs } => write!(f, "timed out after {secs}s"),
            Self::Api { status, message } => write!(f, "API error (status {status}): {message}"),
            Self::Network { message } => write!(f, "network error: {message}"),
            Self::Decode { message } => write!(f, "undecodable response: {message}"),
            Self::NoContent => write!(f, "no candidate content in response"),
        }
    }
}

impl CallFailure {
    /// Creates a `Network` failure from any displayable transport error.
    #[must_use]
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }

    /// Creates a `Decode` failure from any displayable parse error.
    #[must_use]
    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }
}

impl GenerateError {
    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if this error is a deployment defect that should
    /// prevent the process from serving any request.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
