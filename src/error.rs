//! Error types for llmcall.

use thiserror::Error;

/// Prefix carried by every sentinel error string returned from
/// [`LlmClient::call`](crate::client::LlmClient::call).
pub const ERROR_PREFIX: &str = "Error: Could not get response from Ollama.";

/// Failures of a single generate request against the inference endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure: connection refused, DNS, body read, etc.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success HTTP status.
    #[error("status {status}: {message}")]
    Status { status: u16, message: String },

    /// The endpoint answered 2xx but the body was not a generate response.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Render the error as the string value returned by `call`.
    pub fn sentinel(&self) -> String {
        format!("{} Details: {}", ERROR_PREFIX, self)
    }
}

/// Returns `true` when `response` is a sentinel error string rather than
/// model output.
pub fn is_error_response(response: &str) -> bool {
    response.starts_with(ERROR_PREFIX)
}

/// Failures reading or writing the cache file.
///
/// These never escape a call; the cache store logs them and carries on.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid cache JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias over [`LlmError`].
pub type Result<T> = std::result::Result<T, LlmError>;
