//! Benchmark utilities.

#![warn(missing_docs)]

use rand::seq::SliceRandom;
use rand::Rng;

const WORDS: &[&str] = &[
    "the", "of", "and", "to", "in", "a", "is", "that", "for", "it", "as", "was", "with", "be",
    "by", "on", "not", "he", "this", "are", "or", "his", "from", "at", "which", "but", "have",
    "an", "had", "they", "you", "were", "their", "one", "all", "we", "can", "her", "has",
    "there", "been", "if", "more", "when", "will", "would", "who", "so", "no", "new", "york",
];

/// Generates `count` random n-grams of `size` words with random counts.
///
/// Keys may repeat; the first record for a key wins on lookup.
pub fn random_ngrams(count: usize, size: usize) -> Vec<(String, u64)> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let words: Vec<&str> = (0..size)
                .map(|_| *WORDS.choose(&mut rng).unwrap_or(&"the"))
                .collect();
            (words.join(" "), rng.gen_range(1..100_000))
        })
        .collect()
}

/// Picks `count` query token lists of `size` words.
pub fn random_queries(count: usize, size: usize) -> Vec<Vec<String>> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            (0..size)
                .map(|_| WORDS.choose(&mut rng).unwrap_or(&"the").to_string())
                .collect()
        })
        .collect()
}
