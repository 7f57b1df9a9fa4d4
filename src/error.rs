//! Huginn error types

use std::time::Duration;

use crate::extract::ParseError;

/// Message the HTTP layer shows end users for any propagated gateway error.
pub const PUBLIC_FAILURE_MESSAGE: &str = "generation failed";

/// Huginn error types
#[derive(Debug, thiserror::Error)]
pub enum HuginnError {
    // Cache store errors (always absorbed inside the gateway)
    #[error("cache store unavailable: {0}")]
    StoreUnavailable(String),

    // Completion service errors
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    // Credential errors
    #[error("no completion credentials configured")]
    NoCredentialsConfigured,

    #[error("all completion credentials exhausted")]
    CredentialsExhausted,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl HuginnError {
    /// Whether this failure means the credential hit its quota.
    ///
    /// This is the only class the gateway rotates on.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, HuginnError::RateLimited { .. })
    }

    /// Provider-supplied `retry-after` hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            HuginnError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Short label used for metric and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            HuginnError::StoreUnavailable(_) => "store_unavailable",
            HuginnError::RateLimited { .. } => "rate_limited",
            HuginnError::AuthenticationFailed => "authentication_failed",
            HuginnError::ModelNotFound(_) => "model_not_found",
            HuginnError::Api { .. } => "api",
            HuginnError::Http(_) => "http",
            HuginnError::NoCredentialsConfigured => "no_credentials",
            HuginnError::CredentialsExhausted => "credentials_exhausted",
            HuginnError::Json(_) => "json",
            HuginnError::Parse(_) => "parse",
            HuginnError::InvalidInput(_) => "invalid_input",
            HuginnError::Configuration(_) => "configuration",
        }
    }

    /// Text safe to show an end user. Never leaks internal error detail.
    pub fn public_message(&self) -> &'static str {
        PUBLIC_FAILURE_MESSAGE
    }

    /// Classify a completion-service failure from its status code and body.
    ///
    /// Status takes precedence; the message is consulted for services that
    /// report quota exhaustion with a non-429 status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            429 => HuginnError::RateLimited { retry_after: None },
            401 | 403 => HuginnError::AuthenticationFailed,
            404 => HuginnError::ModelNotFound(message),
            _ if mentions_rate_limit(&message) => HuginnError::RateLimited { retry_after: None },
            _ => HuginnError::Api { status, message },
        }
    }
}

fn mentions_rate_limit(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("rate limit") || lower.contains("rate_limit") || lower.contains("429")
}

/// Result type alias for Huginn operations
pub type Result<T> = std::result::Result<T, HuginnError>;
