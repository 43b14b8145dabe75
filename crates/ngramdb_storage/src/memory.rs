//! In-memory store for testing.

use crate::error::{StorageError, StorageResult};
use crate::store::{DocRef, DocumentReader, Resource, StoreDirectory, StoreOpener};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A stored document: field name to textual value.
pub type Document = BTreeMap<String, String>;

/// Failures to inject for one store path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faults {
    /// Fail [`StoreOpener::open`].
    pub open: bool,
    /// Fail [`StoreDirectory::open_reader`].
    pub open_reader: bool,
    /// Fail [`DocumentReader::search_exact`] and [`DocumentReader::read_field`].
    pub search: bool,
    /// Fail [`DocumentReader::close`].
    pub close_reader: bool,
    /// Fail [`StoreDirectory::close`].
    pub close_directory: bool,
}

/// A release attempt recorded by [`InMemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Path of the store the resource belongs to.
    pub path: PathBuf,
    /// Which resource was released.
    pub resource: Resource,
    /// Whether the release succeeded.
    pub ok: bool,
}

#[derive(Debug, Default)]
struct Registry {
    stores: HashMap<PathBuf, Arc<Vec<Document>>>,
    faults: HashMap<PathBuf, Faults>,
    releases: Vec<Release>,
}

impl Registry {
    fn faults(&self, path: &Path) -> Faults {
        self.faults.get(path).copied().unwrap_or_default()
    }
}

/// An in-memory store keyed by path.
///
/// This store is suitable for:
/// - Unit tests that need a store without building an index on disk
/// - Tests of failure handling, through [`Faults`]
/// - Tests that check every resource is released, through [`InMemoryStore::releases`]
///
/// Clones share the same registry.
///
/// # Example
///
/// ```rust
/// use ngramdb_storage::{DocumentReader, InMemoryStore, StoreDirectory, StoreOpener};
/// use std::path::Path;
///
/// let store = InMemoryStore::new();
/// store.insert(Path::new("/corpus/2grams"), [("ngram", "of the"), ("count", "7")]);
///
/// let directory = store.open(Path::new("/corpus/2grams")).unwrap();
/// let reader = directory.open_reader().unwrap();
/// let hits = reader.search_exact("ngram", "of the", 1).unwrap();
/// assert_eq!(reader.read_field(hits[0], "count").unwrap().as_deref(), Some("7"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    registry: Arc<RwLock<Registry>>,
}

impl InMemoryStore {
    /// Creates an empty store registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an empty store at `path`.
    pub fn create(&self, path: &Path) {
        self.registry
            .write()
            .stores
            .entry(path.to_path_buf())
            .or_default();
    }

    /// Adds a document to the store at `path`, creating the store if needed.
    pub fn insert<I, K, V>(&self, path: &Path, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let document: Document = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let mut registry = self.registry.write();
        let docs = registry.stores.entry(path.to_path_buf()).or_default();
        Arc::make_mut(docs).push(document);
    }

    /// Sets the failures to inject for the store at `path`.
    pub fn set_faults(&self, path: &Path, faults: Faults) {
        self.registry
            .write()
            .faults
            .insert(path.to_path_buf(), faults);
    }

    /// Returns every release attempted so far, in order.
    #[must_use]
    pub fn releases(&self) -> Vec<Release> {
        self.registry.read().releases.clone()
    }

    fn record_release(&self, path: &Path, resource: Resource, ok: bool) {
        self.registry.write().releases.push(Release {
            path: path.to_path_buf(),
            resource,
            ok,
        });
    }
}

impl StoreOpener for InMemoryStore {
    type Directory = InMemoryDirectory;

    fn open(&self, path: &Path) -> StorageResult<InMemoryDirectory> {
        let registry = self.registry.read();
        if registry.faults(path).open {
            return Err(StorageError::Injected { operation: "open" });
        }
        if !registry.stores.contains_key(path) {
            return Err(StorageError::open(path, "no store registered at this path"));
        }
        Ok(InMemoryDirectory {
            path: path.to_path_buf(),
            store: self.clone(),
        })
    }
}

/// Directory resource of an [`InMemoryStore`].
#[derive(Debug)]
pub struct InMemoryDirectory {
    path: PathBuf,
    store: InMemoryStore,
}

impl StoreDirectory for InMemoryDirectory {
    type Reader = InMemoryReader;

    fn path(&self) -> &Path {
        &self.path
    }

    fn open_reader(&self) -> StorageResult<InMemoryReader> {
        let registry = self.store.registry.read();
        if registry.faults(&self.path).open_reader {
            return Err(StorageError::Injected {
                operation: "open_reader",
            });
        }
        let documents = registry
            .stores
            .get(&self.path)
            .cloned()
            .ok_or_else(|| StorageError::open(&self.path, "store was removed"))?;
        Ok(InMemoryReader {
            path: self.path.clone(),
            store: self.store.clone(),
            documents,
        })
    }

    fn close(self) -> StorageResult<()> {
        let fail = self.store.registry.read().faults(&self.path).close_directory;
        self.store
            .record_release(&self.path, Resource::Directory, !fail);
        if fail {
            return Err(StorageError::Injected {
                operation: "close_directory",
            });
        }
        Ok(())
    }
}

/// Read handle of an [`InMemoryStore`].
///
/// Sees a snapshot of the documents taken when it was opened.
#[derive(Debug)]
pub struct InMemoryReader {
    path: PathBuf,
    store: InMemoryStore,
    documents: Arc<Vec<Document>>,
}

impl InMemoryReader {
    fn check_search_fault(&self) -> StorageResult<()> {
        if self.store.registry.read().faults(&self.path).search {
            return Err(StorageError::Injected { operation: "search" });
        }
        Ok(())
    }
}

impl DocumentReader for InMemoryReader {
    fn search_exact(&self, field: &str, value: &str, limit: usize) -> StorageResult<Vec<DocRef>> {
        self.check_search_fault()?;
        Ok(self
            .documents
            .iter()
            .enumerate()
            .filter(|(_, doc)| doc.get(field).is_some_and(|v| v == value))
            .take(limit)
            .map(|(i, _)| DocRef::new(0, i as u32))
            .collect())
    }

    fn read_field(&self, doc: DocRef, field: &str) -> StorageResult<Option<String>> {
        self.check_search_fault()?;
        let document = self
            .documents
            .get(doc.doc as usize)
            .filter(|_| doc.segment == 0)
            .ok_or_else(|| StorageError::InvalidDocument {
                message: format!("no document {:?}", doc),
            })?;
        Ok(document.get(field).cloned())
    }

    fn num_docs(&self) -> u64 {
        self.documents.len() as u64
    }

    fn close(self) -> StorageResult<()> {
        let fail = self.store.registry.read().faults(&self.path).close_reader;
        self.store.record_release(&self.path, Resource::Reader, !fail);
        if fail {
            return Err(StorageError::Injected {
                operation: "close_reader",
            });
        }
        Ok(())
    }
}
