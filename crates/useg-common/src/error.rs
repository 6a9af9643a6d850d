//! Error taxonomy for the micro-segmentation flow.
//!
//! Every failure surfaces as a distinct variant so callers can render a
//! specific message. None of these are retried anywhere in the workspace;
//! a timeout is as fatal as a rejection.

use thiserror::Error;

/// Micro-segmentation error type
#[derive(Error, Debug)]
pub enum UsegError {
    /// The identity tuple does not resolve on the fabric (missing tenant,
    /// profile or EPG, or an EPG with no bridge-domain binding).
    #[error("cannot resolve on fabric: {0}")]
    Resolution(String),

    /// Structurally invalid builder input.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The fabric controller rejected the submitted configuration.
    #[error("fabric rejected commit (code {code}): {text}")]
    Commit { code: String, text: String },

    /// A lookup or commit call exceeded its deadline.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Authentication with the controller failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A response or data file could not be decoded.
    #[error("malformed data: {0}")]
    Malformed(String),

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for UsegError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UsegError::Timeout(err.to_string())
        } else {
            UsegError::Http(err)
        }
    }
}

impl From<serde_json::Error> for UsegError {
    fn from(err: serde_json::Error) -> Self {
        UsegError::Malformed(err.to_string())
    }
}

/// Result type for the micro-segmentation workspace
pub type Result<T> = std::result::Result<T, UsegError>;
