//! Error types for the Firestore client.

use requiva_storage::{ConfigError, StorageError};
use thiserror::Error;

/// Result type for Firestore operations.
pub type FirestoreResult<T> = Result<T, FirestoreError>;

/// Errors from the Firestore REST client.
#[derive(Debug, Error)]
pub enum FirestoreError {
    /// The request could not be sent or the response not read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// Signing the assertion or exchanging it for a token failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A response did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl FirestoreError {
    /// Creates an HTTP transport error.
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http(message.into())
    }

    /// Creates an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

impl From<FirestoreError> for StorageError {
    fn from(err: FirestoreError) -> Self {
        StorageError::remote(err.to_string())
    }
}

impl From<FirestoreError> for ConfigError {
    fn from(err: FirestoreError) -> Self {
        ConfigError::connect(err.to_string())
    }
}
