//! Error handling for the Snaplist client

use std::fmt;
use thiserror::Error;

/// Unified error type for the Snaplist client
#[derive(Error, Debug)]
pub enum Error {
    /// The request exceeded the configured timeout before a response arrived
    #[error("request timed out")]
    Timeout,

    /// Network-level failure (DNS, connection refused) with no response received
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx response; the server's body is carried verbatim
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Token malformed or missing a required claim
    #[error("token decode error: {0}")]
    Decode(String),

    /// Rejected client-side, before any request was sent
    #[error("validation error: {0}")]
    Validation(String),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Create a new decode error
    pub fn decode<T: fmt::Display>(msg: T) -> Self {
        Error::Decode(msg.to_string())
    }

    /// Create a new transport error
    pub fn transport<T: fmt::Display>(msg: T) -> Self {
        Error::Transport(msg.to_string())
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// The payload to retain for rendering: the server's response body when
    /// one was received, otherwise the client-side message.
    pub fn payload(&self) -> String {
        match self {
            Error::HttpStatus { body, .. } if !body.is_empty() => body.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Transport(err.to_string())
        }
    }
}
