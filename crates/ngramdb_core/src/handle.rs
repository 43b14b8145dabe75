//! Per-size index handle.

use crate::config::IndexConfig;
use crate::error::{CloseFailure, CoreError, CoreResult};
use ngramdb_storage::{DocumentReader, Resource, StoreDirectory, StoreOpener};
use std::path::{Path, PathBuf};

/// The open resources serving one n-gram size.
///
/// Bundles the directory resource and the read handle opened over it. A
/// handle is created once when its [`IndexSet`](crate::IndexSet) is opened and
/// is released exactly once by [`SizeHandle::close`].
pub struct SizeHandle<D: StoreDirectory> {
    size: usize,
    path: PathBuf,
    directory: D,
    reader: D::Reader,
}

impl<D: StoreDirectory> SizeHandle<D> {
    /// Opens the directory and a reader over it.
    ///
    /// If the reader cannot be opened the directory is dropped again and the
    /// open error is returned.
    pub fn open<O>(store: &O, size: usize, path: &Path) -> CoreResult<Self>
    where
        O: StoreOpener<Directory = D>,
    {
        let directory = store.open(path)?;
        let reader = directory.open_reader()?;
        tracing::debug!(size, path = %path.display(), docs = reader.num_docs(), "opened n-gram index");

        Ok(Self {
            size,
            path: path.to_path_buf(),
            directory,
            reader,
        })
    }

    /// Returns the n-gram size this handle serves.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the index directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of n-grams in the index.
    #[must_use]
    pub fn num_docs(&self) -> u64 {
        self.reader.num_docs()
    }

    /// Looks up the count stored for `key`.
    ///
    /// Returns 0 if the key is not in the index. Store failures are returned
    /// as they are; they are not retried.
    pub fn count(&self, config: &IndexConfig, key: &str) -> CoreResult<u64> {
        let hits = self.reader.search_exact(&config.key_field, key, 1)?;
        let Some(&doc) = hits.first() else {
            return Ok(0);
        };

        let value = self
            .reader
            .read_field(doc, &config.count_field)?
            .ok_or_else(|| {
                CoreError::record_format(key, format!("no '{}' field", config.count_field))
            })?;

        value.parse::<u64>().map_err(|e| {
            CoreError::record_format(key, format!("'{value}' is not a valid count: {e}"))
        })
    }

    /// Releases the reader, then the directory.
    ///
    /// The directory is released even if the reader fails to close. Every
    /// failure is returned.
    pub fn close(self) -> Vec<CloseFailure> {
        let mut failures = Vec::new();

        if let Err(error) = self.reader.close() {
            failures.push(CloseFailure {
                size: self.size,
                resource: Resource::Reader,
                error,
            });
        }
        if let Err(error) = self.directory.close() {
            failures.push(CloseFailure {
                size: self.size,
                resource: Resource::Directory,
                error,
            });
        }

        tracing::debug!(size = self.size, failures = failures.len(), "closed n-gram index");
        failures
    }
}

impl<D: StoreDirectory> std::fmt::Debug for SizeHandle<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SizeHandle")
            .field("size", &self.size)
            .field("path", &self.path)
            .field("num_docs", &self.num_docs())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngramdb_storage::{Faults, InMemoryStore, StorageError};

    fn store_with(rows: &[(&str, &str)]) -> (InMemoryStore, PathBuf) {
        let store = InMemoryStore::new();
        let path = PathBuf::from("/corpus/2grams");
        store.create(&path);
        for (key, count) in rows {
            store.insert(&path, [("ngram", *key), ("count", *count)]);
        }
        (store, path)
    }

    #[test]
    fn counts_present_and_absent_keys() {
        let (store, path) = store_with(&[("of the", "1200"), ("in a", "0")]);
        let handle = SizeHandle::open(&store, 2, &path).unwrap();
        let config = IndexConfig::default();

        assert_eq!(handle.size(), 2);
        assert_eq!(handle.num_docs(), 2);
        assert_eq!(handle.count(&config, "of the").unwrap(), 1200);
        assert_eq!(handle.count(&config, "in a").unwrap(), 0);
        assert_eq!(handle.count(&config, "the of").unwrap(), 0);
    }

    #[test]
    fn first_match_wins() {
        let (store, path) = store_with(&[("a b", "5"), ("a b", "7")]);
        let handle = SizeHandle::open(&store, 2, &path).unwrap();
        assert_eq!(handle.count(&IndexConfig::default(), "a b").unwrap(), 5);
    }

    #[test]
    fn malformed_counts_are_errors() {
        let (store, path) = store_with(&[("a b", "five"), ("c d", "-3"), ("e f", " 4")]);
        store.insert(&path, [("ngram", "g h")]);
        let handle = SizeHandle::open(&store, 2, &path).unwrap();
        let config = IndexConfig::default();

        for key in ["a b", "c d", "e f", "g h"] {
            assert!(
                matches!(handle.count(&config, key), Err(CoreError::RecordFormat { .. })),
                "{key} should be malformed"
            );
        }
    }

    #[test]
    fn search_failure_propagates() {
        let (store, path) = store_with(&[("a b", "5")]);
        store.set_faults(
            &path,
            Faults {
                search: true,
                ..Faults::default()
            },
        );
        let handle = SizeHandle::open(&store, 2, &path).unwrap();
        assert!(matches!(
            handle.count(&IndexConfig::default(), "a b"),
            Err(CoreError::Storage(StorageError::Injected { .. }))
        ));
    }

    #[test]
    fn reader_open_failure_propagates() {
        let (store, path) = store_with(&[]);
        store.set_faults(
            &path,
            Faults {
                open_reader: true,
                ..Faults::default()
            },
        );
        assert!(SizeHandle::open(&store, 2, &path).is_err());
    }

    #[test]
    fn close_releases_directory_after_reader_failure() {
        let (store, path) = store_with(&[]);
        store.set_faults(
            &path,
            Faults {
                close_reader: true,
                ..Faults::default()
            },
        );
        let handle = SizeHandle::open(&store, 2, &path).unwrap();

        let failures = handle.close();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].resource, Resource::Reader);

        let releases = store.releases();
        assert_eq!(releases.len(), 2);
        assert_eq!(releases[1].resource, Resource::Directory);
        assert!(releases[1].ok);
    }
}
