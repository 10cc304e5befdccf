//! Error types for the credential store.

use thiserror::Error;

/// Errors that can occur in credential operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// An account with the same email already exists.
    #[error("an account with this email already exists")]
    DuplicateIdentity,

    /// No record matched the email, or the password did not verify.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// A token was unknown, already consumed, or past its expiry.
    #[error("invalid or expired")]
    TokenInvalidOrExpired,

    /// The requested user was not found.
    #[error("user not found: {0}")]
    NotFound(String),

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Password hashing failed.
    #[error("hashing error: {0}")]
    Hashing(String),
}

/// Result type for credential operations.
pub type Result<T> = std::result::Result<T, AuthError>;
