//! Error types for Requiva core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// CSV encoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unknown purchase-order source.
    #[error("unknown PO source: {value} (expected ShopBlue, Stock Room or External Vendor)")]
    UnknownPoSource {
        /// The rejected input.
        value: String,
    },

    /// Order input failed validation.
    #[error(transparent)]
    Validation(#[from] crate::validate::ValidationError),
}

impl CoreError {
    /// Creates an unknown PO source error.
    pub fn unknown_po_source(value: impl Into<String>) -> Self {
        Self::UnknownPoSource {
            value: value.into(),
        }
    }
}
