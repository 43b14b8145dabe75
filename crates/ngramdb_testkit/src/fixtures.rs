//! Corpus fixtures.
//!
//! Builds small n-gram corpora in temporary directories, in the on-disk
//! layout [`IndexSet`] reads:
//!
//! ```text
//! <temp>/
//! ├─ 2grams/     # tantivy index
//! └─ 3grams/     # tantivy index
//! ```

use ngramdb_core::{size_dir_name, CoreResult, IndexConfig, IndexSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tantivy::schema::{Schema, STORED, STRING};
use tantivy::{doc, Index, IndexWriter, TantivyDocument};
use tempfile::TempDir;

/// Field holding the joined n-gram.
pub const NGRAM_FIELD: &str = "ngram";
/// Field holding the occurrence count.
pub const COUNT_FIELD: &str = "count";

const WRITER_MEMORY: usize = 50_000_000;

/// Writes a tantivy index of `(ngram, count)` records at `path`.
///
/// Counts are stored as text, exactly as given, so malformed records can be
/// written too. The directory is created if needed and must be empty.
pub fn write_ngram_index<K, V>(path: &Path, records: &[(K, V)]) -> tantivy::Result<()>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fs::create_dir_all(path)?;

    let mut builder = Schema::builder();
    let ngram = builder.add_text_field(NGRAM_FIELD, STRING | STORED);
    let count = builder.add_text_field(COUNT_FIELD, STORED);
    let index = Index::create_in_dir(path, builder.build())?;

    let mut writer: IndexWriter<TantivyDocument> =
        index.writer_with_num_threads(1, WRITER_MEMORY)?;
    for (key, value) in records {
        writer.add_document(doc!(ngram => key.as_ref(), count => value.as_ref()))?;
    }
    writer.commit()?;
    writer.wait_merging_threads()?;
    Ok(())
}

/// A corpus root in a temporary directory, removed on drop.
///
/// # Example
///
/// ```rust,ignore
/// use ngramdb_testkit::CorpusFixture;
///
/// let corpus = CorpusFixture::new()
///     .with_ngrams(2, &[("new york", 42)])
///     .with_ngrams(3, &[("new york city", 17)]);
/// let index = corpus.open().unwrap();
/// assert_eq!(index.get_count(&["new", "york"]).unwrap(), 42);
/// ```
#[derive(Debug)]
pub struct CorpusFixture {
    dir: TempDir,
}

impl Default for CorpusFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusFixture {
    /// Creates an empty corpus root.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Returns the corpus root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the directory of the index for `size`.
    pub fn size_dir(&self, size: usize) -> PathBuf {
        self.root().join(size_dir_name(size))
    }

    /// Adds an index for `size` holding the given n-gram counts.
    pub fn with_ngrams<K: AsRef<str>>(self, size: usize, ngrams: &[(K, u64)]) -> Self {
        let records: Vec<(&str, String)> = ngrams
            .iter()
            .map(|(key, count)| (key.as_ref(), count.to_string()))
            .collect();
        self.with_records(size, &records)
    }

    /// Adds an index for `size` with raw `(ngram, count)` text records.
    pub fn with_records<K, V>(self, size: usize, records: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        write_ngram_index(&self.size_dir(size), records).expect("Failed to write n-gram index");
        self
    }

    /// Creates an empty directory named `name` under the root.
    pub fn with_dir(self, name: &str) -> Self {
        fs::create_dir_all(self.root().join(name)).expect("Failed to create directory");
        self
    }

    /// Creates a regular file named `name` under the root.
    pub fn with_file(self, name: &str) -> Self {
        self.write_file(name).expect("Failed to create file");
        self
    }

    fn write_file(&self, name: &str) -> io::Result<()> {
        fs::write(self.root().join(name), b"not an index")
    }

    /// Opens the corpus with the default configuration.
    pub fn open(&self) -> CoreResult<IndexSet> {
        IndexSet::open(self.root())
    }

    /// Opens the corpus with a custom configuration.
    pub fn open_with_config(&self, config: IndexConfig) -> CoreResult<IndexSet> {
        IndexSet::open_with_config(self.root(), config)
    }
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// A corpus with both sizes and a few well-known n-grams.
    ///
    /// | n-gram           | count |
    /// |------------------|-------|
    /// | `new york`       | 42    |
    /// | `york new`       | 3     |
    /// | `of the`         | 1200  |
    /// | `New York`       | 7     |
    /// | `new york city`  | 17    |
    /// | `the new york`   | 9     |
    pub fn standard_corpus() -> CorpusFixture {
        CorpusFixture::new()
            .with_ngrams(
                2,
                &[
                    ("new york", 42),
                    ("york new", 3),
                    ("of the", 1200),
                    ("New York", 7),
                ],
            )
            .with_ngrams(3, &[("new york city", 17), ("the new york", 9)])
    }

    /// A corpus with only a `2grams/` index.
    pub fn bigram_only_corpus() -> CorpusFixture {
        CorpusFixture::new().with_ngrams(2, &[("new york", 42), ("of the", 1200)])
    }
}
