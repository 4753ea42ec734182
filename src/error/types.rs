//! Core error types.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Coarse error category, used for presentation and retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller supplied missing or out-of-range input.
    Validation,
    /// The upstream did not answer within the wall-clock bound.
    Timeout,
    /// Every candidate was unusable (loading, missing, unparseable).
    Unavailable,
    /// The upstream rejected the request outright.
    Upstream,
    /// Transport-level failure.
    Network,
    /// JSON encoding/decoding failure.
    Parsing,
    /// Invalid configuration detected at startup.
    Configuration,
    /// Anything else.
    Internal,
}

/// Errors surfaced by the relay.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelayError {
    /// Missing/invalid fields, oversized text, wrong content type.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Client-observed upstream timeout.
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// All candidates were unavailable.
    #[error("Upstream unavailable: {message}")]
    Unavailable {
        message: String,
        /// Candidates tried in the final pass, in order.
        attempted_models: Vec<String>,
        /// Whether at least one candidate reported a loading-style condition.
        transient: bool,
    },

    /// Hard upstream error, passed through verbatim.
    #[error("Upstream error ({status}): {body}")]
    UpstreamError { status: u16, body: String },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl RelayError {
    /// Build an `Unavailable` error from the candidates tried in a pass.
    pub fn unavailable(
        message: impl Into<String>,
        attempted_models: Vec<String>,
        transient: bool,
    ) -> Self {
        Self::Unavailable {
            message: message.into(),
            attempted_models,
            transient,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput(_) => ErrorCategory::Validation,
            Self::TimeoutError(_) => ErrorCategory::Timeout,
            Self::Unavailable { .. } => ErrorCategory::Unavailable,
            Self::UpstreamError { .. } => ErrorCategory::Upstream,
            Self::HttpError(_) => ErrorCategory::Network,
            Self::JsonError(_) => ErrorCategory::Parsing,
            Self::ConfigurationError(_) => ErrorCategory::Configuration,
            Self::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// HTTP status the server boundary reports for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::TimeoutError(_) => 408,
            Self::Unavailable { .. } => 503,
            Self::UpstreamError { status, .. } => *status,
            Self::HttpError(_)
            | Self::JsonError(_)
            | Self::ConfigurationError(_)
            | Self::InternalError(_) => 500,
        }
    }

    /// Whether a caller may reasonably retry the same request later.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TimeoutError(_) => true,
            Self::Unavailable { transient, .. } => *transient,
            Self::UpstreamError { status, .. } => matches!(status, 429 | 503 | 504),
            _ => false,
        }
    }

    /// Message suitable for the `error` field of a response body.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(msg)
            | Self::TimeoutError(msg)
            | Self::HttpError(msg)
            | Self::JsonError(msg)
            | Self::ConfigurationError(msg)
            | Self::InternalError(msg) => msg.clone(),
            Self::Unavailable { message, .. } => message.clone(),
            Self::UpstreamError { body, .. } => body.clone(),
        }
    }

    /// Candidates tried, when the error came out of a sequencing pass.
    pub fn attempted_models(&self) -> Option<&[String]> {
        match self {
            Self::Unavailable {
                attempted_models, ..
            } => Some(attempted_models),
            _ => None,
        }
    }
}
