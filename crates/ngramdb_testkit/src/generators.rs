//! Property-based test generators using proptest.

use proptest::prelude::*;
use std::collections::BTreeMap;

/// Strategy for generating a single lowercase token.
pub fn token_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,8}").expect("Invalid regex")
}

/// Strategy for generating an n-gram of `size` tokens.
pub fn ngram_strategy(size: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(token_strategy(), size)
}

/// Strategy for generating a corpus of distinct `size`-grams with counts.
pub fn corpus_strategy(
    size: usize,
    max_ngrams: usize,
) -> impl Strategy<Value = BTreeMap<Vec<String>, u64>> {
    prop::collection::btree_map(ngram_strategy(size), 0..1_000_000u64, 1..=max_ngrams)
}

/// Joins tokens the way the default configuration does.
pub fn join_tokens(tokens: &[String]) -> String {
    tokens.join(" ")
}
