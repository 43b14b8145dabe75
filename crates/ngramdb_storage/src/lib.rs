//! # ngramdb Storage
//!
//! Read-only key/document store interface and implementations for ngramdb.
//!
//! Stores are **opaque key/document stores** - they know nothing about
//! n-grams. A store is opened in three steps, mirroring how on-disk search
//! indexes are used:
//!
//! 1. [`StoreOpener::open`] turns a path into a directory resource
//! 2. [`StoreDirectory::open_reader`] opens a read handle over it
//! 3. [`DocumentReader`] answers exact-match searches and field reads
//!
//! Resources are released in the reverse order with `close`.
//!
//! ## Design Principles
//!
//! - Stores are read-only once opened
//! - Readers must be `Send + Sync` for concurrent lookups
//! - Local read-only storage faults are treated as unrecoverable: errors are
//!   returned, never retried
//!
//! ## Available Stores
//!
//! - [`TantivyStore`] - On-disk tantivy indexes
//! - [`InMemoryStore`] - For testing, with fault injection

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod memory;
mod store;
mod tantivy_store;

pub use error::{StorageError, StorageResult};
pub use memory::{Document, Faults, InMemoryDirectory, InMemoryReader, InMemoryStore, Release};
pub use store::{DocRef, DocumentReader, Resource, StoreDirectory, StoreOpener};
pub use tantivy_store::{TantivyDirectory, TantivyReader, TantivyStore};
