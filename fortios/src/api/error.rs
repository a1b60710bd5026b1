use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// FortiManager reports failures inside a successful HTTP response
    #[error("{url}: {message} (code {code})")]
    JsonRpc {
        code: i64,
        message: String,
        url: String,
    },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Authentication failed")]
    AuthError,

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Service unavailable, retry later")]
    ServiceUnavailable,
}
