//! Size directory discovery.
//!
//! Resolves which configured n-gram sizes have an index under a root
//! directory:
//!
//! ```text
//! <root>/
//! ├─ 2grams/     # index for token pairs
//! └─ 3grams/     # index for token triples
//! ```
//!
//! A missing size directory is skipped; only when every configured size is
//! missing does resolution fail. Resolution does no I/O of its own: the
//! directory check is passed in, so the policy can be tested on its own.

use crate::config::size_dir_name;
use crate::error::{CoreError, CoreResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Outcome of resolving the configured sizes under a root directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Size to index directory, for every size whose directory exists.
    pub resolved: BTreeMap<usize, PathBuf>,
    /// Sizes whose directory was not found.
    pub skipped: Vec<usize>,
}

impl Discovery {
    /// Resolves `sizes` under `root` against the file system.
    ///
    /// A size counts as present when `<root>/<size>grams` is a directory;
    /// symlinks are followed and a regular file of that name is ignored.
    #[must_use]
    pub fn scan(root: &Path, sizes: &[usize]) -> Self {
        resolve(root, sizes, Path::is_dir)
    }

    /// Fails with [`CoreError::NoNgramData`] if no size was resolved.
    pub fn require_any(self, root: &Path, sizes: &[usize]) -> CoreResult<Self> {
        if self.resolved.is_empty() {
            return Err(CoreError::NoNgramData {
                root: root.to_path_buf(),
                sizes: sizes.to_vec(),
            });
        }
        Ok(self)
    }

    /// Returns true if no size was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

/// Resolves `sizes` under `root`, using `is_dir` to check for directories.
///
/// Duplicate sizes are resolved once.
pub fn resolve<F>(root: &Path, sizes: &[usize], is_dir: F) -> Discovery
where
    F: Fn(&Path) -> bool,
{
    let mut discovery = Discovery::default();
    for &size in sizes {
        if discovery.resolved.contains_key(&size) || discovery.skipped.contains(&size) {
            continue;
        }
        let path = root.join(size_dir_name(size));
        if is_dir(&path) {
            discovery.resolved.insert(size, path);
        } else {
            discovery.skipped.push(size);
        }
    }
    discovery
}
