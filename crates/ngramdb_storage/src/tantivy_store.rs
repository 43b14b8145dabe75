//! Tantivy-backed store for on-disk indexes.

use crate::error::{StorageError, StorageResult};
use crate::store::{DocRef, DocumentReader, StoreDirectory, StoreOpener};
use std::path::{Path, PathBuf};
use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::TermQuery;
use tantivy::schema::{Field, IndexRecordOption, Value};
use tantivy::{DocAddress, Index, IndexReader, ReloadPolicy, Searcher, TantivyDocument, Term};

/// Opens tantivy indexes from the file system.
///
/// Every directory is memory-mapped and read-only: readers are created with
/// a manual reload policy because the index never changes after it was built.
///
/// # Example
///
/// ```no_run
/// use ngramdb_storage::{DocumentReader, StoreDirectory, StoreOpener, TantivyStore};
/// use std::path::Path;
///
/// let directory = TantivyStore.open(Path::new("corpus/2grams")).unwrap();
/// let reader = directory.open_reader().unwrap();
/// let hits = reader.search_exact("ngram", "of the", 1).unwrap();
/// println!("{} hits", hits.len());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TantivyStore;

impl StoreOpener for TantivyStore {
    type Directory = TantivyDirectory;

    fn open(&self, path: &Path) -> StorageResult<TantivyDirectory> {
        let directory =
            MmapDirectory::open(path).map_err(|e| StorageError::open(path, e.to_string()))?;
        tracing::trace!(path = %path.display(), "opened tantivy directory");
        Ok(TantivyDirectory {
            path: path.to_path_buf(),
            directory,
        })
    }
}

/// A memory-mapped tantivy directory.
#[derive(Debug)]
pub struct TantivyDirectory {
    path: PathBuf,
    directory: MmapDirectory,
}

impl StoreDirectory for TantivyDirectory {
    type Reader = TantivyReader;

    fn path(&self) -> &Path {
        &self.path
    }

    fn open_reader(&self) -> StorageResult<TantivyReader> {
        let index = Index::open(self.directory.clone())
            .map_err(|e| StorageError::open(&self.path, e.to_string()))?;
        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| StorageError::open(&self.path, e.to_string()))?;
        let searcher = reader.searcher();

        Ok(TantivyReader {
            index,
            _reader: reader,
            searcher,
        })
    }

    fn close(self) -> StorageResult<()> {
        // Mappings are released when the directory is dropped.
        tracing::trace!(path = %self.path.display(), "closed tantivy directory");
        Ok(())
    }
}

/// Read handle over a tantivy index.
///
/// Holds a single [`Searcher`] for its whole lifetime, so every query sees the
/// same snapshot of the index.
pub struct TantivyReader {
    index: Index,
    _reader: IndexReader,
    searcher: Searcher,
}

impl TantivyReader {
    fn field(&self, name: &str) -> StorageResult<Field> {
        self.index
            .schema()
            .get_field(name)
            .map_err(|_| StorageError::UnknownField {
                field: name.to_string(),
            })
    }

    fn address(&self, doc: DocRef) -> StorageResult<DocAddress> {
        let segment = self
            .searcher
            .segment_readers()
            .get(doc.segment as usize)
            .ok_or_else(|| StorageError::InvalidDocument {
                message: format!("no segment {}", doc.segment),
            })?;
        if doc.doc >= segment.max_doc() {
            return Err(StorageError::InvalidDocument {
                message: format!("no document {} in segment {}", doc.doc, doc.segment),
            });
        }
        Ok(DocAddress::new(doc.segment, doc.doc))
    }
}

impl std::fmt::Debug for TantivyReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyReader")
            .field("num_docs", &self.searcher.num_docs())
            .finish_non_exhaustive()
    }
}

impl DocumentReader for TantivyReader {
    fn search_exact(&self, field: &str, value: &str, limit: usize) -> StorageResult<Vec<DocRef>> {
        let field = self.field(field)?;
        if limit == 0 {
            return Ok(Vec::new());
        }

        let query = TermQuery::new(
            Term::from_field_text(field, value),
            IndexRecordOption::Basic,
        );
        let top_docs = self.searcher.search(&query, &TopDocs::with_limit(limit))?;

        Ok(top_docs
            .into_iter()
            .map(|(_score, address)| DocRef::new(address.segment_ord, address.doc_id))
            .collect())
    }

    fn read_field(&self, doc: DocRef, field: &str) -> StorageResult<Option<String>> {
        let field = self.field(field)?;
        let address = self.address(doc)?;
        let document: TantivyDocument = self.searcher.doc(address)?;

        Ok(document.get_first(field).and_then(|value| {
            value
                .as_str()
                .map(str::to_owned)
                .or_else(|| value.as_u64().map(|n| n.to_string()))
                .or_else(|| value.as_i64().map(|n| n.to_string()))
        }))
    }

    fn num_docs(&self) -> u64 {
        self.searcher.num_docs()
    }

    fn close(self) -> StorageResult<()> {
        // Dropping the searcher and reader releases their segment handles.
        drop(self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tantivy::schema::{Schema, STORED, STRING};
    use tantivy::{doc, IndexWriter};
    use tempfile::tempdir;

    fn build_index(path: &Path, rows: &[(&str, &str)]) {
        let mut builder = Schema::builder();
        let ngram = builder.add_text_field("ngram", STRING | STORED);
        let count = builder.add_text_field("count", STORED);
        let index = Index::create_in_dir(path, builder.build()).unwrap();

        let mut writer: IndexWriter = index.writer_with_num_threads(1, 50_000_000).unwrap();
        for (key, value) in rows {
            writer.add_document(doc!(ngram => *key, count => *value)).unwrap();
        }
        writer.commit().unwrap();
    }

    #[test]
    fn numeric_counts_read_as_decimal_text() {
        let dir = tempdir().unwrap();
        let mut builder = Schema::builder();
        let ngram = builder.add_text_field("ngram", STRING | STORED);
        let count = builder.add_u64_field("count", STORED);
        let index = Index::create_in_dir(dir.path(), builder.build()).unwrap();
        let mut writer: IndexWriter = index.writer_with_num_threads(1, 50_000_000).unwrap();
        writer.add_document(doc!(ngram => "a b", count => 5u64)).unwrap();
        writer.commit().unwrap();

        let directory = TantivyStore.open(dir.path()).unwrap();
        let reader = directory.open_reader().unwrap();
        let hits = reader.search_exact("ngram", "a b", 1).unwrap();
        assert_eq!(
            reader.read_field(hits[0], "count").unwrap().as_deref(),
            Some("5")
        );
    }

    #[test]
    fn signed_counts_keep_their_sign() {
        let dir = tempdir().unwrap();
        let mut builder = Schema::builder();
        let ngram = builder.add_text_field("ngram", STRING | STORED);
        let count = builder.add_i64_field("count", STORED);
        let index = Index::create_in_dir(dir.path(), builder.build()).unwrap();
        let mut writer: IndexWriter = index.writer_with_num_threads(1, 50_000_000).unwrap();
        writer.add_document(doc!(ngram => "a b", count => -3i64)).unwrap();
        writer.commit().unwrap();

        let directory = TantivyStore.open(dir.path()).unwrap();
        let reader = directory.open_reader().unwrap();
        let hits = reader.search_exact("ngram", "a b", 1).unwrap();
        assert_eq!(
            reader.read_field(hits[0], "count").unwrap().as_deref(),
            Some("-3")
        );
    }

    #[test]
    fn open_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let result = TantivyStore.open(&dir.path().join("missing"));
        assert!(matches!(result, Err(StorageError::Open { .. })));
    }

    #[test]
    fn open_reader_on_empty_directory_fails() {
        let dir = tempdir().unwrap();
        let directory = TantivyStore.open(dir.path()).unwrap();
        assert!(matches!(
            directory.open_reader(),
            Err(StorageError::Open { .. })
        ));
    }

    #[test]
    fn exact_search_and_read() {
        let dir = tempdir().unwrap();
        build_index(dir.path(), &[("new york", "42"), ("york new", "3")]);

        let directory = TantivyStore.open(dir.path()).unwrap();
        assert_eq!(directory.path(), dir.path());
        let reader = directory.open_reader().unwrap();
        assert_eq!(reader.num_docs(), 2);

        let hits = reader.search_exact("ngram", "new york", 1).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(
            reader.read_field(hits[0], "count").unwrap().as_deref(),
            Some("42")
        );

        let hits = reader.search_exact("ngram", "york new", 1).unwrap();
        assert_eq!(
            reader.read_field(hits[0], "count").unwrap().as_deref(),
            Some("3")
        );

        reader.close().unwrap();
        directory.close().unwrap();
    }

    #[test]
    fn search_is_exact() {
        let dir = tempdir().unwrap();
        build_index(dir.path(), &[("New York", "1")]);

        let reader = TantivyStore.open(dir.path()).unwrap().open_reader().unwrap();
        assert!(reader.search_exact("ngram", "new york", 1).unwrap().is_empty());
        assert!(reader.search_exact("ngram", "New  York", 1).unwrap().is_empty());
        assert!(reader.search_exact("ngram", "New", 1).unwrap().is_empty());
        assert_eq!(reader.search_exact("ngram", "New York", 1).unwrap().len(), 1);
    }

    #[test]
    fn zero_limit_returns_nothing() {
        let dir = tempdir().unwrap();
        build_index(dir.path(), &[("a b", "1")]);

        let reader = TantivyStore.open(dir.path()).unwrap().open_reader().unwrap();
        assert!(reader.search_exact("ngram", "a b", 0).unwrap().is_empty());
    }

    #[test]
    fn unknown_field_is_reported() {
        let dir = tempdir().unwrap();
        build_index(dir.path(), &[("a b", "1")]);

        let reader = TantivyStore.open(dir.path()).unwrap().open_reader().unwrap();
        assert!(matches!(
            reader.search_exact("token", "a b", 1),
            Err(StorageError::UnknownField { .. })
        ));
    }

    #[test]
    fn invalid_doc_ref_is_reported() {
        let dir = tempdir().unwrap();
        build_index(dir.path(), &[("a b", "1")]);

        let reader = TantivyStore.open(dir.path()).unwrap().open_reader().unwrap();
        let result = reader.read_field(DocRef::new(99, 0), "count");
        assert!(matches!(result, Err(StorageError::InvalidDocument { .. })));
    }
}
