//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Stored credential digest is not in the expected format.
    #[error("Malformed credential digest")]
    MalformedDigest,

    /// Invalid token.
    #[error("Invalid token")]
    InvalidToken,

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
