//! # ngramdb Testkit
//!
//! Test utilities for ngramdb.
//!
//! This crate provides:
//! - Corpus fixtures: tantivy n-gram indexes in temporary directories
//! - Property-based test generators using proptest
//! - Concurrent lookup helpers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ngramdb_testkit::prelude::*;
//!
//! #[test]
//! fn counts_from_disk() {
//!     let corpus = scenarios::standard_corpus();
//!     let index = corpus.open().unwrap();
//!     assert_eq!(index.get_count(&["new", "york"]).unwrap(), 42);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;
