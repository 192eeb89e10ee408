//! Error types for tablechat
//!
//! Domain errors use thiserror; the conversation controller converts the
//! per-cycle ones into assistant messages at its boundary.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure talking to a translation backend
#[derive(Debug, Error)]
pub enum TranslationError {
    /// Network, timeout, or body decoding failure from the HTTP client
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as returned
        body: String,
    },

    /// Backend answered without any message content
    #[error("Backend returned no message content")]
    EmptyResponse,

    /// Backend could not be constructed from its configuration
    #[error("Backend configuration error: {0}")]
    Config(String),
}

/// Convenience result alias for translation calls
pub type TranslationResult<T> = std::result::Result<T, TranslationError>;

/// The backend reply could not be decoded into a filter specification
#[derive(Debug, Error)]
#[error("could not decode filters from '{text}': {reason}")]
pub struct FilterDecodeError {
    /// Raw reply text that failed to decode
    pub text: String,
    /// Why decoding failed
    pub reason: String,
}

/// Dataset ingestion errors
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Source file could not be opened
    #[error("Failed to open {path}: {source}")]
    Io {
        /// Path of the source file
        path: PathBuf,
        /// Underlying IO error
        source: io::Error,
    },

    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A column required by the schema is absent from the header
    #[error("Column '{0}' missing from source")]
    MissingColumn(String),

    /// A cell could not be read as its column's kind
    #[error("Row {row}, column '{column}': cannot read '{value}'")]
    InvalidValue {
        /// Zero-based data row index
        row: usize,
        /// Column name
        column: String,
        /// Raw cell text
        value: String,
    },

    /// A row does not have one value per column
    #[error("Row {row} has {found} values, expected {expected}")]
    RowWidth {
        /// Zero-based row index
        row: usize,
        /// Values present
        found: usize,
        /// Column count
        expected: usize,
    },
}

/// Convenience result alias for dataset operations
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;

/// Any failure that ends a conversation cycle without touching the view
#[derive(Debug, Error)]
pub enum CycleError {
    /// The backend call failed
    #[error(transparent)]
    Translation(#[from] TranslationError),

    /// The backend reply was not a JSON object
    #[error(transparent)]
    Decode(#[from] FilterDecodeError),
}
