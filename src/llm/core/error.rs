use std::time::Duration;
use thiserror::Error;

/// Failure talking to the completion provider
#[derive(Debug, Error)]
pub enum LlmError {
    /// Non-2xx answer without a readable error body, or a transport failure (status 0)
    #[error("HTTP error (status {status}): {body}")]
    HttpError { status: u16, body: String },

    /// The event stream broke off or could not be decoded
    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Rejected before anything was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP 429, with the `Retry-After` hint when the provider sent one
    #[error("Rate limit exceeded (retry after {retry_after:?})")]
    RateLimitExceeded { retry_after: Option<Duration> },

    /// `{"error": {...}}` envelope, either as the body or inside the stream
    #[error("Provider error ({code}): {message}")]
    ProviderError { code: String, message: String },

    #[error("Provider returned no choices")]
    EmptyResponse,
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::HttpError {
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            body: err.to_string(),
        }
    }
}
