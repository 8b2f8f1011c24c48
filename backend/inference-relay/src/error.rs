//! Error types for the inference relay
//!
//! Each pipeline stage maps its failure onto one variant; the orchestrator
//! decides from the variant whether the run aborts or still completes.

use s3_utils::S3Error;

/// Result type for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Trigger payload could not be parsed
    #[error("invalid trigger event: {0}")]
    InvalidEvent(String),

    /// Object could not be fetched or staged
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Object bytes are not a recognizable image
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// Thumbnail could not be encoded
    #[error("failed to encode thumbnail: {0}")]
    Encode(String),

    /// Auth endpoint answered with a non-200 status
    #[error("authentication failed with status {status}")]
    Authentication { status: u16 },

    /// Inference endpoint answered with a non-200 status
    #[error("inference failed with status {status}")]
    Inference { status: u16 },

    /// A 200 response whose body does not match the wire contract
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: &'static str, reason: String },

    /// Transport-level HTTP failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<S3Error> for RelayError {
    fn from(err: S3Error) -> Self {
        RelayError::Fetch(err.to_string())
    }
}

impl From<envy::Error> for RelayError {
    fn from(err: envy::Error) -> Self {
        RelayError::Config(err.to_string())
    }
}
