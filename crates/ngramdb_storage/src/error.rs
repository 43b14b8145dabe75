//! Error types for store operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while opening, searching or releasing a store.
///
/// The stores are local and read-only, so none of these are transient:
/// callers propagate them instead of retrying.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The store at `path` could not be opened.
    #[error("cannot open store at {path}: {message}")]
    Open {
        /// Location of the store.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// The store has no field with this name.
    #[error("unknown field: {field}")]
    UnknownField {
        /// The requested field name.
        field: String,
    },

    /// A search or document read failed inside the store.
    #[error("search failed: {message}")]
    Search {
        /// Description of the failure.
        message: String,
    },

    /// A document reference does not point at a readable document.
    #[error("invalid document: {message}")]
    InvalidDocument {
        /// Description of the problem.
        message: String,
    },

    /// The resource has already been released.
    #[error("store is closed")]
    Closed,

    /// A failure injected by a test store.
    #[error("injected failure during {operation}")]
    Injected {
        /// The operation that was made to fail.
        operation: &'static str,
    },
}

impl StorageError {
    /// Creates an open error for the store at `path`.
    pub fn open(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Open {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a search error.
    pub fn search(message: impl Into<String>) -> Self {
        Self::Search {
            message: message.into(),
        }
    }
}

impl From<tantivy::TantivyError> for StorageError {
    fn from(err: tantivy::TantivyError) -> Self {
        match err {
            tantivy::TantivyError::IoError(io) => {
                Self::Io(io::Error::new(io.kind(), io.to_string()))
            }
            other => Self::search(other.to_string()),
        }
    }
}
