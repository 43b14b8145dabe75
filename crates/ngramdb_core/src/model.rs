//! Language model interface.

use crate::error::CoreResult;

/// N-gram occurrence counts, as consumed by statistical text analysis.
///
/// Implementations are read-only and can be queried from many threads.
pub trait LanguageModel: Send + Sync {
    /// Returns how often `tokens` occurs as a contiguous sequence.
    fn count(&self, tokens: &[&str]) -> CoreResult<u64>;

    /// Returns how often the pair `first second` occurs.
    fn bigram_count(&self, first: &str, second: &str) -> CoreResult<u64> {
        self.count(&[first, second])
    }

    /// Returns how often the triple `first second third` occurs.
    fn trigram_count(&self, first: &str, second: &str, third: &str) -> CoreResult<u64> {
        self.count(&[first, second, third])
    }
}
