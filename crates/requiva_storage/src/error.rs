//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while loading or saving records.
///
/// These propagate to the caller of a single operation. Problems found
/// while choosing a backend are [`ConfigError`]s instead and never escape
/// the selector.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Encoding, decoding or order assembly failed.
    #[error(transparent)]
    Core(#[from] requiva_core::CoreError),

    /// The remote document store rejected or failed a request.
    #[error("remote store error: {message}")]
    Remote {
        /// Description of the failure.
        message: String,
    },

    /// A document key cannot be stored.
    #[error("invalid document key: {key:?}")]
    InvalidKey {
        /// The rejected key.
        key: String,
    },
}

impl StorageError {
    /// Creates a remote store error.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    /// Creates an invalid key error.
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into() }
    }
}

/// Why the remote backend could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No credentials were supplied.
    #[error("no remote store credentials configured")]
    MissingCredentials,

    /// Discrete credentials were supplied without every part.
    #[error("incomplete credentials: {missing} is missing")]
    IncompleteCredentials {
        /// The absent part.
        missing: &'static str,
    },

    /// The credential document could not be parsed.
    #[error("malformed credentials: {message}")]
    MalformedCredentials {
        /// Parser or validation message.
        message: String,
    },

    /// The credentials file could not be read.
    #[error("cannot read credentials file {path:?}: {source}")]
    CredentialsFile {
        /// The file that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Building the remote client failed (network, auth or key material).
    #[error("remote store connection failed: {message}")]
    Connect {
        /// Description of the failure.
        message: String,
    },
}

impl ConfigError {
    /// Creates a malformed credentials error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedCredentials {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }
}
