//! Error Types
//!
//! Failures of backend calls and configuration loading.

use thiserror::Error;

/// Failure of a request against the record endpoint or the login handler
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never completed (network down, CORS, fetch rejected)
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered with a non-2xx status
    #[error("server responded with status {0}")]
    Status(u16),
    /// The body was not the JSON shape we expected
    #[error("could not decode response: {0}")]
    Decode(String),
    /// No `csrfmiddlewaretoken` field on the page
    #[error("no CSRF token found on the page")]
    MissingCsrfToken,
    /// The request was abandoned before it finished
    #[error("request aborted")]
    Aborted,
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Failure to read the page configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config object: {0}")]
    Object(String),
}
