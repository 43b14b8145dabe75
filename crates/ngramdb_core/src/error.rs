//! Error types for ngramdb core.

use ngramdb_storage::{Resource, StorageError};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in ngramdb core operations.
///
/// Absence of an n-gram is not an error: it is a count of zero.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No configured n-gram size has a directory under the root.
    #[error("no n-gram directories ({}) found in {}", expected_dirs(.sizes), .root.display())]
    NoNgramData {
        /// The root directory that was searched.
        root: PathBuf,
        /// The configured sizes.
        sizes: Vec<usize>,
    },

    /// A query asked for an n-gram size that has no open index.
    #[error("no {size}grams index available (indexed sizes: {available:?})")]
    UnsupportedSize {
        /// The requested size (the number of tokens).
        size: usize,
        /// The sizes that are indexed.
        available: Vec<usize>,
    },

    /// The underlying store failed.
    #[error("store error: {0}")]
    Storage(#[from] StorageError),

    /// A matched record does not hold a well-formed count.
    #[error("malformed count record for '{key}': {message}")]
    RecordFormat {
        /// The n-gram key that matched.
        key: String,
        /// Description of the problem.
        message: String,
    },

    /// One or more resources failed to release during close.
    #[error("failed to release {} resource(s): {}", .failures.len(), join_failures(.failures))]
    Close {
        /// Every release that failed.
        failures: Vec<CloseFailure>,
    },
}

impl CoreError {
    /// Creates a record format error.
    pub fn record_format(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordFormat {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// A single failed release during close.
#[derive(Debug)]
pub struct CloseFailure {
    /// The n-gram size of the handle.
    pub size: usize,
    /// Which resource failed to release.
    pub resource: Resource,
    /// The store error.
    pub error: StorageError,
}

impl fmt::Display for CloseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}grams {}: {}", self.size, self.resource, self.error)
    }
}

fn expected_dirs(sizes: &[usize]) -> String {
    sizes
        .iter()
        .map(|size| format!("'{size}grams'"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_failures(failures: &[CloseFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
