use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error as ThisError;

use crate::content_generator::AuthType;

pub const EMBEDDINGS_UNSUPPORTED_MESSAGE: &str =
    "Embeddings are not supported through OpenRouter for Gemini models.";

#[derive(Debug, ThisError)]
pub enum GeneratorError {
    /// Capability the backing API does not offer. Never retried.
    #[error("{0}")]
    UnsupportedOperation(String),

    #[error("Missing API key; set {0}")]
    MissingApiKey(&'static str),

    #[error("Auth type `{0}` has no content generator in this crate")]
    UnsupportedAuthType(AuthType),

    #[error("Invalid HTTP header: {0}")]
    InvalidHeader(String),

    /// Non-2xx upstream reply.
    #[error("Upstream error with status {status}: {message}")]
    UpstreamStatus {
        status: StatusCode,
        message: String,
        /// Truncated raw body, for diagnostics only.
        body: String,
    },

    /// Error object delivered inside an already-open stream.
    #[error("Upstream stream error: {message}")]
    UpstreamStreamError {
        code: Option<Value>,
        message: String,
    },

    /// Transport-level failure (DNS, connect, timeouts, body read).
    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Stream protocol error: {0}")]
    StreamProtocolError(String),
}

impl GeneratorError {
    pub fn embeddings_unsupported() -> Self {
        GeneratorError::UnsupportedOperation(EMBEDDINGS_UNSUPPORTED_MESSAGE.to_string())
    }

    /// Upstream HTTP status, if the failure carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GeneratorError::UpstreamStatus { status, .. } => Some(*status),
            GeneratorError::Reqwest(e) => e.status(),
            _ => None,
        }
    }
}
