//! The n-gram index set.

use crate::config::IndexConfig;
use crate::discovery::Discovery;
use crate::error::{CoreError, CoreResult};
use crate::handle::SizeHandle;
use crate::model::LanguageModel;
use ngramdb_storage::{StoreDirectory, StoreOpener, TantivyDirectory, TantivyStore};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Per-size statistics of an open [`IndexSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeStats {
    /// The n-gram size.
    pub size: usize,
    /// The index directory.
    pub path: PathBuf,
    /// Number of n-grams in the index.
    pub ngrams: u64,
}

/// Read-only n-gram counts backed by one index per n-gram size.
///
/// `IndexSet` is the entry point for count lookups. It:
/// - Discovers which sizes have an index under a root directory
/// - Keeps one [`SizeHandle`] open per discovered size
/// - Routes each lookup to the handle for the number of tokens
/// - Releases every handle on [`IndexSet::close`]
///
/// # Opening
///
/// ```rust,ignore
/// use ngramdb_core::IndexSet;
/// use std::path::Path;
///
/// // Expects Path/2grams and/or Path/3grams
/// let index = IndexSet::open(Path::new("/data/ngrams"))?;
///
/// let count = index.get_count(&["new", "york"])?;
/// println!("'new york' seen {count} times");
///
/// index.close()?;
/// ```
///
/// # Thread Safety
///
/// Lookups take `&self` and touch no mutable state, so one `IndexSet` can be
/// shared (for example in an `Arc`) by any number of threads. `close`
/// consumes the set; once all lookups are done, the owner closes it.
///
/// # Failures
///
/// Local read-only storage faults are treated as unrecoverable: a failing
/// lookup returns the error immediately and is never retried or turned into
/// a zero count.
pub struct IndexSet<D: StoreDirectory = TantivyDirectory> {
    root: PathBuf,
    config: IndexConfig,
    handles: HashMap<usize, SizeHandle<D>>,
    opened: Vec<PathBuf>,
}

impl IndexSet<TantivyDirectory> {
    /// Opens the tantivy indexes for sizes 2 and 3 under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Neither `2grams/` nor `3grams/` exists under `root` (`NoNgramData`)
    /// - An existing index cannot be opened (`Storage`)
    pub fn open(root: &Path) -> CoreResult<Self> {
        Self::open_with_config(root, IndexConfig::default())
    }

    /// Opens the tantivy indexes under `root` with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use ngramdb_core::{IndexConfig, IndexSet};
    ///
    /// let config = IndexConfig::new().sizes([2, 3, 4]);
    /// let index = IndexSet::open_with_config(Path::new("/data/ngrams"), config)?;
    /// ```
    pub fn open_with_config(root: &Path, config: IndexConfig) -> CoreResult<Self> {
        Self::open_with_store(root, config, &TantivyStore)
    }
}

impl<D: StoreDirectory> IndexSet<D> {
    /// Opens the indexes under `root` through `store`.
    pub fn open_with_store<O>(root: &Path, config: IndexConfig, store: &O) -> CoreResult<Self>
    where
        O: StoreOpener<Directory = D>,
    {
        let discovery = Discovery::scan(root, &config.sizes);
        Self::open_discovered(root, config, discovery, store)
    }

    /// Opens the indexes of an already resolved [`Discovery`].
    ///
    /// Either every resolved size is opened or none is: on failure, handles
    /// opened so far are dropped and the error is returned.
    pub fn open_discovered<O>(
        root: &Path,
        config: IndexConfig,
        discovery: Discovery,
        store: &O,
    ) -> CoreResult<Self>
    where
        O: StoreOpener<Directory = D>,
    {
        let discovery = discovery.require_any(root, &config.sizes)?;
        for size in &discovery.skipped {
            tracing::debug!(size, root = %root.display(), "no index directory, skipping size");
        }

        let mut handles = HashMap::with_capacity(discovery.resolved.len());
        let mut opened = Vec::with_capacity(discovery.resolved.len());
        for (size, path) in discovery.resolved {
            let handle = SizeHandle::open(store, size, &path)?;
            handles.insert(size, handle);
            opened.push(path);
        }

        Ok(Self {
            root: root.to_path_buf(),
            config,
            handles,
            opened,
        })
    }

    /// Returns how often `tokens` occurs in the corpus.
    ///
    /// The number of tokens selects the index. Tokens are joined with the
    /// configured separator and matched exactly, so case, whitespace and
    /// order all matter. An n-gram that is not in the index counts 0.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No index was opened for `tokens.len()` (`UnsupportedSize`)
    /// - The store fails (`Storage`)
    /// - The matched record has no valid count (`RecordFormat`)
    pub fn get_count<S: AsRef<str>>(&self, tokens: &[S]) -> CoreResult<u64> {
        let size = tokens.len();
        let handle = self
            .handles
            .get(&size)
            .ok_or_else(|| CoreError::UnsupportedSize {
                size,
                available: self.sizes(),
            })?;

        let key = self.config.join_key(tokens);
        let count = handle.count(&self.config, &key)?;
        tracing::trace!(size, key = %key, count, "n-gram lookup");
        Ok(count)
    }

    /// Returns true if an index is open for `size`.
    #[must_use]
    pub fn has_size(&self, size: usize) -> bool {
        self.handles.contains_key(&size)
    }

    /// Returns the indexed sizes in ascending order.
    #[must_use]
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.handles.keys().copied().collect();
        sizes.sort_unstable();
        sizes
    }

    /// Returns the index directories that were opened.
    #[must_use]
    pub fn opened_dirs(&self) -> &[PathBuf] {
        &self.opened
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Returns per-size statistics, ordered by size.
    #[must_use]
    pub fn stats(&self) -> Vec<SizeStats> {
        let mut stats: Vec<SizeStats> = self
            .handles
            .values()
            .map(|handle| SizeStats {
                size: handle.size(),
                path: handle.path().to_path_buf(),
                ngrams: handle.num_docs(),
            })
            .collect();
        stats.sort_unstable_by_key(|s| s.size);
        stats
    }

    /// Releases every open index.
    ///
    /// For each size the reader is released before its directory. A failed
    /// release does not stop the others; all failures are returned together
    /// in [`CoreError::Close`].
    pub fn close(self) -> CoreResult<()> {
        let mut handles: Vec<SizeHandle<D>> = self.handles.into_values().collect();
        handles.sort_unstable_by_key(SizeHandle::size);

        let failures: Vec<_> = handles.into_iter().flat_map(SizeHandle::close).collect();
        if failures.is_empty() {
            tracing::debug!(root = %self.root.display(), "closed index set");
            Ok(())
        } else {
            Err(CoreError::Close { failures })
        }
    }
}

impl<D: StoreDirectory> LanguageModel for IndexSet<D> {
    fn count(&self, tokens: &[&str]) -> CoreResult<u64> {
        self.get_count(tokens)
    }
}

impl<D: StoreDirectory> fmt::Display for IndexSet<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, path) in self.opened.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", path.display())?;
        }
        f.write_str("]")
    }
}

impl<D: StoreDirectory> fmt::Debug for IndexSet<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexSet")
            .field("root", &self.root)
            .field("sizes", &self.sizes())
            .field("opened", &self.opened)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::resolve;
    use ngramdb_storage::{Faults, InMemoryDirectory, InMemoryStore, Resource, StorageError};

    fn root() -> PathBuf {
        PathBuf::from("/corpus")
    }

    fn store() -> InMemoryStore {
        let store = InMemoryStore::new();
        let bigrams = root().join("2grams");
        let trigrams = root().join("3grams");
        store.insert(&bigrams, [("ngram", "new york"), ("count", "42")]);
        store.insert(&bigrams, [("ngram", "york new"), ("count", "2")]);
        store.insert(&trigrams, [("ngram", "new york city"), ("count", "17")]);
        store
    }

    fn open(store: &InMemoryStore, dirs: &[&str]) -> CoreResult<IndexSet<InMemoryDirectory>> {
        let root = root();
        let present: Vec<PathBuf> = dirs.iter().map(|d| root.join(d)).collect();
        let config = IndexConfig::default();
        let discovery = resolve(&root, &config.sizes, |p| present.iter().any(|q| q == p));
        IndexSet::open_discovered(&root, config, discovery, store)
    }

    #[test]
    fn counts_bigrams_and_trigrams() {
        let store = store();
        let index = open(&store, &["2grams", "3grams"]).unwrap();

        assert_eq!(index.get_count(&["new", "york"]).unwrap(), 42);
        assert_eq!(index.get_count(&["new", "york", "city"]).unwrap(), 17);
        assert_eq!(index.bigram_count("new", "york").unwrap(), 42);
        assert_eq!(index.trigram_count("new", "york", "city").unwrap(), 17);
    }

    #[test]
    fn unseen_ngrams_count_zero() {
        let store = store();
        let index = open(&store, &["2grams", "3grams"]).unwrap();

        assert_eq!(index.get_count(&["old", "york"]).unwrap(), 0);
        assert_eq!(index.get_count(&["New", "york"]).unwrap(), 0);
        assert_eq!(index.get_count(&["york", "city", "new"]).unwrap(), 0);
    }

    #[test]
    fn order_matters() {
        let store = store();
        let index = open(&store, &["2grams"]).unwrap();

        assert_eq!(index.get_count(&["new", "york"]).unwrap(), 42);
        assert_eq!(index.get_count(&["york", "new"]).unwrap(), 2);
    }

    #[test]
    fn missing_size_is_unsupported_not_zero() {
        let store = store();
        let index = open(&store, &["2grams"]).unwrap();

        assert!(index.has_size(2));
        assert!(!index.has_size(3));
        let err = index.get_count(&["new", "york", "city"]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnsupportedSize { size: 3, ref available } if available == &vec![2]
        ));
        assert_eq!(index.get_count(&["new", "york"]).unwrap(), 42);
    }

    #[test]
    fn other_lengths_are_unsupported() {
        let store = store();
        let index = open(&store, &["2grams", "3grams"]).unwrap();

        assert!(matches!(
            index.get_count(&["new"]),
            Err(CoreError::UnsupportedSize { size: 1, .. })
        ));
        assert!(matches!(
            index.get_count::<&str>(&[]),
            Err(CoreError::UnsupportedSize { size: 0, .. })
        ));
    }

    #[test]
    fn no_directories_fails() {
        let store = store();
        assert!(matches!(
            open(&store, &[]),
            Err(CoreError::NoNgramData { .. })
        ));
    }

    #[test]
    fn open_failure_returns_no_set() {
        let store = store();
        store.set_faults(
            &root().join("3grams"),
            Faults {
                open_reader: true,
                ..Faults::default()
            },
        );
        assert!(matches!(
            open(&store, &["2grams", "3grams"]),
            Err(CoreError::Storage(StorageError::Injected { .. }))
        ));
    }

    #[test]
    fn display_lists_opened_dirs() {
        let store = store();
        let index = open(&store, &["2grams", "3grams"]).unwrap();
        assert_eq!(index.to_string(), "[/corpus/2grams, /corpus/3grams]");
        assert_eq!(index.opened_dirs().len(), 2);

        let index = open(&store, &["3grams"]).unwrap();
        assert_eq!(index.to_string(), "[/corpus/3grams]");
    }

    #[test]
    fn stats_per_size() {
        let store = store();
        let index = open(&store, &["2grams", "3grams"]).unwrap();
        let stats = index.stats();
        assert_eq!(stats.len(), 2);
        assert_eq!((stats[0].size, stats[0].ngrams), (2, 2));
        assert_eq!((stats[1].size, stats[1].ngrams), (3, 1));
    }

    #[test]
    fn close_releases_reader_then_directory() {
        let store = store();
        let index = open(&store, &["2grams", "3grams"]).unwrap();
        index.close().unwrap();

        let released: Vec<_> = store
            .releases()
            .into_iter()
            .map(|r| (r.path, r.resource))
            .collect();
        assert_eq!(
            released,
            vec![
                (root().join("2grams"), Resource::Reader),
                (root().join("2grams"), Resource::Directory),
                (root().join("3grams"), Resource::Reader),
                (root().join("3grams"), Resource::Directory),
            ]
        );
    }

    #[test]
    fn close_attempts_every_release() {
        let store = store();
        store.set_faults(
            &root().join("2grams"),
            Faults {
                close_reader: true,
                close_directory: true,
                ..Faults::default()
            },
        );
        let index = open(&store, &["2grams", "3grams"]).unwrap();

        let failures = match index.close() {
            Err(CoreError::Close { failures }) => failures,
            other => panic!("expected close error, got {other:?}"),
        };
        assert_eq!(failures.len(), 2);
        assert!(failures.iter().all(|f| f.size == 2));

        let releases = store.releases();
        assert_eq!(releases.len(), 4);
        assert!(releases[2..].iter().all(|r| r.ok));
    }

    #[test]
    fn usable_as_language_model() {
        let store = store();
        let index = open(&store, &["2grams", "3grams"]).unwrap();
        let model: &dyn LanguageModel = &index;
        assert_eq!(model.count(&["new", "york"]).unwrap(), 42);
        assert_eq!(model.bigram_count("york", "new").unwrap(), 2);
    }
}
