//! Client error type.

use thiserror::Error;

/// Errors from the API gateway and session storage.
///
/// Transport failures and server rejections are kept distinct so callers can
/// tell "could not reach the API" apart from "the API said no".
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The session could not be read or written.
    #[error("session storage error: {0}")]
    Storage(String),

    /// The configured base URL is unusable.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
}
