//! Index set configuration.

/// N-gram sizes looked for when no other sizes are configured.
pub const DEFAULT_SIZES: [usize; 2] = [2, 3];

/// Configuration for opening an [`IndexSet`](crate::IndexSet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// N-gram sizes to look for under the root, each in `{size}grams/`.
    pub sizes: Vec<usize>,

    /// Field holding the joined n-gram key.
    pub key_field: String,

    /// Field holding the occurrence count.
    pub count_field: String,

    /// Separator placed between tokens to build the key.
    pub separator: char,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            key_field: "ngram".to_string(),
            count_field: "count".to_string(),
            separator: ' ',
        }
    }
}

impl IndexConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the n-gram sizes to look for.
    ///
    /// Sizes are kept in ascending order and duplicates are dropped.
    #[must_use]
    pub fn sizes(mut self, sizes: impl IntoIterator<Item = usize>) -> Self {
        let mut sizes: Vec<usize> = sizes.into_iter().collect();
        sizes.sort_unstable();
        sizes.dedup();
        self.sizes = sizes;
        self
    }

    /// Sets the key field name.
    #[must_use]
    pub fn key_field(mut self, field: impl Into<String>) -> Self {
        self.key_field = field.into();
        self
    }

    /// Sets the count field name.
    #[must_use]
    pub fn count_field(mut self, field: impl Into<String>) -> Self {
        self.count_field = field.into();
        self
    }

    /// Sets the token separator.
    #[must_use]
    pub const fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Joins tokens into the key stored in the key field.
    #[must_use]
    pub fn join_key<S: AsRef<str>>(&self, tokens: &[S]) -> String {
        let mut key = String::new();
        for (i, token) in tokens.iter().enumerate() {
            if i > 0 {
                key.push(self.separator);
            }
            key.push_str(token.as_ref());
        }
        key
    }
}

/// Returns the subdirectory name holding the index for `size`.
#[must_use]
pub fn size_dir_name(size: usize) -> String {
    format!("{size}grams")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_config() {
        let config = IndexConfig::default();
        assert_eq!(config.sizes, vec![2, 3]);
        assert_eq!(config.key_field, "ngram");
        assert_eq!(config.count_field, "count");
        assert_eq!(config.separator, ' ');
    }

    #[test]
    fn builder_pattern() {
        let config = IndexConfig::new()
            .sizes([3, 2, 3, 4])
            .key_field("key")
            .count_field("freq")
            .separator('\t');

        assert_eq!(config.sizes, vec![2, 3, 4]);
        assert_eq!(config.key_field, "key");
        assert_eq!(config.count_field, "freq");
        assert_eq!(config.separator, '\t');
    }

    #[test]
    fn dir_names() {
        assert_eq!(size_dir_name(2), "2grams");
        assert_eq!(size_dir_name(3), "3grams");
    }

    #[test]
    fn join_key_uses_separator() {
        let config = IndexConfig::default();
        assert_eq!(config.join_key(&["new", "york"]), "new york");
        assert_eq!(config.join_key(&["a", "b", "c"]), "a b c");

        let config = config.separator('_');
        assert_eq!(config.join_key(&["a", "b"]), "a_b");
    }

    #[test]
    fn join_key_keeps_tokens_verbatim() {
        let config = IndexConfig::default();
        assert_eq!(config.join_key(&["New", " York"]), "New  York");
        assert_eq!(config.join_key(&["", ""]), " ");
    }

    proptest! {
        #[test]
        fn join_key_has_one_separator_per_gap(
            tokens in proptest::collection::vec("[a-z]{1,8}", 1..5)
        ) {
            let key = IndexConfig::default().join_key(&tokens);
            prop_assert_eq!(key.matches(' ').count(), tokens.len() - 1);
            prop_assert_eq!(key.split(' ').collect::<Vec<_>>(), tokens.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
