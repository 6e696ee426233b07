//! Token counting used to size message groups.

use std::sync::Arc;
use tiktoken_rs::CoreBPE;
use tracing::warn;

/// Maps text to a token count under a fixed encoding.
///
/// Implementations must be deterministic: the same text always yields the
/// same count.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn count(&self, text: &str) -> usize {
        self(text)
    }
}

/// Exact counts using the `o200k_base` BPE encoding. Clones share the tables.
#[derive(Clone)]
pub struct TiktokenCounter {
    bpe: Arc<CoreBPE>,
}

impl TiktokenCounter {
    /// # Errors
    ///
    /// Returns an error if the embedded encoding tables fail to load.
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            bpe: Arc::new(tiktoken_rs::o200k_base()?),
        })
    }
}

impl std::fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("encoding", &"o200k_base")
            .finish()
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}

/// Rough estimate of roughly four characters per token.
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// Counter backed by [`estimate_tokens`], for callers that cannot load an encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimateCounter;

impl TokenCounter for EstimateCounter {
    fn count(&self, text: &str) -> usize {
        estimate_tokens(text)
    }
}

/// `o200k_base` when the encoding loads, the character estimate otherwise.
#[derive(Debug, Clone)]
pub enum DefaultCounter {
    Tiktoken(TiktokenCounter),
    Estimate(EstimateCounter),
}

impl DefaultCounter {
    #[must_use]
    pub fn load() -> Self {
        match TiktokenCounter::new() {
            Ok(counter) => DefaultCounter::Tiktoken(counter),
            Err(e) => {
                warn!("Failed to load o200k_base tokenizer, estimating token counts: {}", e);
                DefaultCounter::Estimate(EstimateCounter)
            }
        }
    }
}

impl TokenCounter for DefaultCounter {
    fn count(&self, text: &str) -> usize {
        match self {
            DefaultCounter::Tiktoken(counter) => counter.count(text),
            DefaultCounter::Estimate(counter) => counter.count(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiktoken_counter_is_deterministic() {
        let counter = TiktokenCounter::new().unwrap();
        let text = "**Alice** (User): Did you find the lighthouse keeper?";
        let first = counter.count(text);
        assert!(first > 0);
        assert_eq!(first, counter.count(text));
        assert_eq!(counter.count(""), 0);
    }

    #[test]
    fn test_tiktoken_counts_grow_with_text() {
        let counter = TiktokenCounter::new().unwrap();
        let short = counter.count("The storm rolled in.");
        let long = counter.count(&"The storm rolled in. ".repeat(20));
        assert!(long > short);
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 1);
        assert_eq!(estimate_tokens("hello"), 2);
        assert_eq!(EstimateCounter.count("abcdefgh"), 3);
    }

    #[test]
    fn test_default_counter_loads_tiktoken() {
        let counter = DefaultCounter::load();
        assert!(matches!(counter, DefaultCounter::Tiktoken(_)));

        let text = "Mara waited at the pier until the fog lifted.";
        let exact = TiktokenCounter::new().unwrap();
        assert_eq!(counter.count(text), exact.count(text));
    }

    #[test]
    fn test_estimate_fallback_counts() {
        let counter = DefaultCounter::Estimate(EstimateCounter);
        assert_eq!(counter.count("abcdefgh"), estimate_tokens("abcdefgh"));
    }

    #[test]
    fn test_cloned_counters_share_tables() {
        let counter = TiktokenCounter::new().unwrap();
        let clone = counter.clone();
        assert!(Arc::ptr_eq(&counter.bpe, &clone.bpe));
    }

    #[test]
    fn test_closures_are_counters() {
        let words = |text: &str| text.split_whitespace().count();
        assert_eq!(words.count("one two three"), 3);
    }
}
