//! Store trait definitions.

use crate::error::StorageResult;
use std::path::Path;

/// Reference to a document returned by a search.
///
/// Only meaningful for the reader that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocRef {
    /// Segment (or partition) the document lives in.
    pub segment: u32,
    /// Document id within the segment.
    pub doc: u32,
}

impl DocRef {
    /// Creates a document reference.
    #[must_use]
    pub const fn new(segment: u32, doc: u32) -> Self {
        Self { segment, doc }
    }
}

/// Opens directory resources for a store.
///
/// This is the entry point of a store implementation: it turns a path into a
/// [`StoreDirectory`], from which read handles are opened.
pub trait StoreOpener: Send + Sync {
    /// The directory resource type.
    type Directory: StoreDirectory;

    /// Opens the store located at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not hold a readable store.
    fn open(&self, path: &Path) -> StorageResult<Self::Directory>;
}

/// An opened directory resource.
///
/// # Invariants
///
/// - `close` consumes the directory, so it is released at most once
/// - readers opened from a directory must be closed before the directory
pub trait StoreDirectory: Send + Sync {
    /// The read handle type.
    type Reader: DocumentReader;

    /// Returns the location of this directory.
    fn path(&self) -> &Path;

    /// Opens a read handle over this directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory content cannot be read.
    fn open_reader(&self) -> StorageResult<Self::Reader>;

    /// Releases the directory resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the release fails.
    fn close(self) -> StorageResult<()>;
}

/// A read handle with a search interface.
///
/// Stores are **opaque key/document stores**: a document is a set of named
/// fields with textual values, and the only query is "find documents whose
/// field equals this exact value".
///
/// Readers are shared across threads; every query method takes `&self`.
pub trait DocumentReader: Send + Sync {
    /// Finds up to `limit` documents whose `field` equals `value` exactly.
    ///
    /// Results are ordered best match first. A `limit` of zero yields no
    /// results.
    ///
    /// # Errors
    ///
    /// Returns an error if `field` does not exist or the search fails.
    fn search_exact(&self, field: &str, value: &str, limit: usize) -> StorageResult<Vec<DocRef>>;

    /// Reads the value of `field` in the document `doc`.
    ///
    /// Returns `None` if the document has no value for the field.
    ///
    /// # Errors
    ///
    /// Returns an error if `field` does not exist or the document cannot be
    /// read.
    fn read_field(&self, doc: DocRef, field: &str) -> StorageResult<Option<String>>;

    /// Returns the number of documents visible to this reader.
    fn num_docs(&self) -> u64;

    /// Releases the read handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the release fails.
    fn close(self) -> StorageResult<()>;
}

/// The kind of resource a store hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// A read handle ([`DocumentReader`]).
    Reader,
    /// A directory resource ([`StoreDirectory`]).
    Directory,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reader => f.write_str("reader"),
            Self::Directory => f.write_str("directory"),
        }
    }
}
