//! Aniki error types

use std::time::Duration;

/// Aniki error types
#[derive(Debug, thiserror::Error)]
pub enum AnikiError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("request timed out")]
    Timeout,

    #[error("authentication failed")]
    AuthenticationFailed,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty response from model")]
    EmptyResponse,

    // Configuration errors (fatal at startup, never per-request)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Every candidate model exhausted every attempt.
    #[error("all models failed: {}", .models.join(", "))]
    AllModelsFailed { models: Vec<String> },

    // Cache persistence errors are logged and swallowed at the call site;
    // this variant only surfaces from explicit load/save helpers.
    #[error("cache I/O error: {0}")]
    CacheIo(String),
}

impl AnikiError {
    /// Whether this error should be retried on the same candidate model.
    ///
    /// Rate limits and timeouts back off and retry; everything else
    /// advances the fallback chain immediately.
    pub fn is_transient(&self) -> bool {
        matches!(self, AnikiError::RateLimited { .. } | AnikiError::Timeout)
    }

    /// Provider-supplied retry hint, if any (from a `RateLimited` error).
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            AnikiError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Coarse bucket for choosing a user-facing fallback reply.
    pub fn reply_kind(&self) -> FailureKind {
        match self {
            AnikiError::RateLimited { .. } => FailureKind::RateLimit,
            AnikiError::Timeout => FailureKind::Timeout,
            AnikiError::Http(_) | AnikiError::Api { .. } => FailureKind::Network,
            _ => FailureKind::Generic,
        }
    }
}

/// User-visible failure taxonomy. Maps 1:1 onto the canned replies in
/// [`prompts::error_reply`](crate::prompts::error_reply).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Timeout,
    RateLimit,
    Generic,
}

/// Result type alias for aniki operations
pub type Result<T> = std::result::Result<T, AnikiError>;
