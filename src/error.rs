//! Error types for the digit-net library

use std::path::PathBuf;

use thiserror::Error;

use crate::network::dims::NetworkDims;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File could not be opened, created or renamed
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A weight-file token is not a floating-point number
    #[error("line {line}: '{token}' is not a valid number")]
    InvalidNumber { line: usize, token: String },

    /// A weight-file row has the wrong number of values
    #[error("line {line}: {section} row has {found} values, expected {expected}")]
    RowLength {
        line: usize,
        section: &'static str,
        expected: usize,
        found: usize,
    },

    /// A section ended before all of its rows were read
    #[error("{section}: file ended after {found_rows} of {expected_rows} rows")]
    UnexpectedEof {
        section: &'static str,
        expected_rows: usize,
        found_rows: usize,
    },

    /// Structurally invalid weight file
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// A required tensor section is absent
    #[error("weight file has no '{0}' section")]
    MissingSection(&'static str),

    /// Declared dimensions disagree with the live network
    #[error("dimension mismatch: network is {expected}, file declares {found}")]
    DimensionMismatch {
        expected: NetworkDims,
        found: NetworkDims,
    },

    /// Malformed dataset row
    #[error("dataset line {line}: {reason}")]
    Dataset { line: usize, reason: String },

    /// A sample does not fit the network shape
    #[error("invalid sample: {0}")]
    InvalidSample(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
