//! Fuzzy Matching Engine
//!
//! Normalized Levenshtein similarity between short strings (book names and
//! query fragments). Lengths are counted in grapheme clusters so that accented
//! or combined characters cost a single edit.

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Stateless fuzzy matcher
pub struct FuzzyMatcher;

impl FuzzyMatcher {
    /// Normalize text for matching
    /// - Unicode NFC normalization
    /// - Lowercase
    pub fn normalize(text: &str) -> String {
        text.nfc().collect::<String>().to_lowercase()
    }

    /// Classic edit distance: insert, delete and substitute all cost 1.
    pub fn levenshtein(a: &str, b: &str) -> usize {
        let source: Vec<&str> = a.graphemes(true).collect();
        let target: Vec<&str> = b.graphemes(true).collect();

        strsim::generic_levenshtein(&source, &target)
    }

    /// `1 - distance / max_len`, in `[0, 1]`. Two empty strings are identical.
    ///
    /// Case-sensitive; callers pass normalized (lowercased) text.
    pub fn similarity(a: &str, b: &str) -> f64 {
        let len_a = a.graphemes(true).count();
        let len_b = b.graphemes(true).count();
        let longest = len_a.max(len_b);
        if longest == 0 {
            return 1.0;
        }

        let distance = Self::levenshtein(a, b);
        1.0 - distance as f64 / longest as f64
    }

    /// Check for substring match (case-insensitive)
    pub fn contains(haystack: &str, needle: &str) -> bool {
        if needle.is_empty() {
            return false;
        }

        Self::normalize(haystack).contains(&Self::normalize(needle))
    }
}
