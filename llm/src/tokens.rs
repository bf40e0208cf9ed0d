//! Token count estimation.

/// Strategy for estimating token counts when the backend does not report
/// them. Pluggable so an accurate tokenizer can be substituted without
/// changing adapter call sites.
pub trait TokenEstimator {
    /// Estimate the number of tokens in `text`.
    fn estimate(&self, text: &str) -> u32;
}

/// Coarse deterministic estimator: one token per four characters, rounded
/// down. A provisional approximation of a real tokenizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharEstimator;

impl TokenEstimator for CharEstimator {
    fn estimate(&self, text: &str) -> u32 {
        (text.chars().count() / 4) as u32
    }
}

/// Estimate tokens with the default [`CharEstimator`].
pub fn estimate_tokens(text: &str) -> u32 {
    CharEstimator.estimate(text)
}
