//! Client error types.

use thiserror::Error;

/// Errors that can occur calling the Classync API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a failure envelope.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The server answered success without the expected payload.
    #[error("Missing response payload")]
    MissingPayload,
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
