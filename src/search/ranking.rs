//! Ranking & Scoring System
//!
//! Additive, fixed-weight integer scoring. Result order is user-visible, so the
//! default constants and the truncation of the similarity term must not drift.

use super::fuzzy::FuzzyMatcher;
use super::result::{ResultKind, SearchResult};
use serde::{Deserialize, Serialize};

/// Scoring weights for different match signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Title equals the query
    pub title_exact: i64,
    /// Title contains the query
    pub title_contains: i64,
    /// Book name contains the query
    pub book_contains: i64,
    /// Multiplier on book-name similarity when it does not contain the query
    pub book_similarity_scale: f64,
    /// Kind priority
    pub kind_weights: KindWeights,
}

/// Per-kind bonus; more specific results win ties on relevance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindWeights {
    pub verse: i64,
    pub chapter: i64,
    pub book: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            title_exact: 100,
            title_contains: 50,
            book_contains: 30,
            book_similarity_scale: 20.0,
            kind_weights: KindWeights::default(),
        }
    }
}

impl Default for KindWeights {
    fn default() -> Self {
        Self {
            verse: 20,
            chapter: 15,
            book: 10,
        }
    }
}

impl KindWeights {
    fn for_kind(&self, kind: ResultKind) -> i64 {
        match kind {
            ResultKind::Verse => self.verse,
            ResultKind::Chapter => self.chapter,
            ResultKind::Book => self.book,
        }
    }
}

/// Complete match score with all components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    pub title: i64,
    pub book_relevance: i64,
    pub kind: i64,
    pub total: i64,
}

impl MatchScore {
    /// Score `result` against a normalized (lowercased) query
    pub fn calculate(result: &SearchResult, query: &str, weights: &ScoringWeights) -> Self {
        let title = FuzzyMatcher::normalize(&result.title);
        let title_score = if title == query {
            weights.title_exact
        } else if !query.is_empty() && title.contains(query) {
            weights.title_contains
        } else {
            0
        };

        let book_name = FuzzyMatcher::normalize(result.book.name);
        let book_relevance = if !query.is_empty() && book_name.contains(query) {
            weights.book_contains
        } else {
            // Truncates toward zero; the similarity is never negative
            (FuzzyMatcher::similarity(&book_name, query) * weights.book_similarity_scale) as i64
        };

        let kind = weights.kind_weights.for_kind(result.kind);

        Self {
            title: title_score,
            book_relevance,
            kind,
            total: title_score + book_relevance + kind,
        }
    }
}

/// Orders candidates by descending score
#[derive(Debug, Clone, Default)]
pub struct SearchRanker {
    weights: ScoringWeights,
}

impl SearchRanker {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, result: &SearchResult, query: &str) -> MatchScore {
        MatchScore::calculate(result, query, &self.weights)
    }

    /// Sort by score, highest first. Equal scores keep insertion order.
    pub fn rank(&self, candidates: Vec<SearchResult>, query: &str) -> Vec<SearchResult> {
        let mut scored: Vec<(i64, SearchResult)> = candidates
            .into_iter()
            .map(|result| (self.score(&result, query).total, result))
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored.into_iter().map(|(_, result)| result).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Book, BookCatalog};

    fn book(code: &str) -> Book {
        *BookCatalog::standard().lookup(code.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.title_exact, 100);
        assert_eq!(weights.title_contains, 50);
        assert_eq!(weights.book_contains, 30);
        assert_eq!(weights.book_similarity_scale, 20.0);
        assert_eq!(weights.kind_weights.verse, 20);
        assert_eq!(weights.kind_weights.chapter, 15);
        assert_eq!(weights.kind_weights.book, 10);
    }

    #[test]
    fn test_exact_book_title() {
        let weights = ScoringWeights::default();
        let score = MatchScore::calculate(&SearchResult::for_book(book("JHN"), "john"), "john", &weights);
        assert_eq!(score.title, 100);
        assert_eq!(score.book_relevance, 30);
        assert_eq!(score.kind, 10);
        assert_eq!(score.total, 140);
    }

    #[test]
    fn test_partial_book_title() {
        let weights = ScoringWeights::default();
        let score = MatchScore::calculate(&SearchResult::for_book(book("1JN"), "john"), "john", &weights);
        assert_eq!(score.title, 50);
        assert_eq!(score.book_relevance, 30);
        assert_eq!(score.total, 90);
    }

    #[test]
    fn test_similarity_term_truncates() {
        let weights = ScoringWeights::default();
        // similarity("john", "john 3:16") = 1 - 5/9 = 0.444.. -> 8.88 -> 8
        let chapter = SearchResult::for_chapter(book("JHN"), 3);
        let score = MatchScore::calculate(&chapter, "john 3:16", &weights);
        assert_eq!(score.title, 0);
        assert_eq!(score.book_relevance, 8);
        assert_eq!(score.total, 23);

        let verse = SearchResult::for_verse(book("JHN"), 3, 16);
        let score = MatchScore::calculate(&verse, "john 3:16", &weights);
        assert_eq!(score.total, 28);
    }

    #[test]
    fn test_rank_descending() {
        let ranker = SearchRanker::default();
        let results = vec![
            SearchResult::for_book(book("1JN"), "john"),
            SearchResult::for_book(book("JHN"), "john"),
        ];
        let ranked = ranker.rank(results, "john");
        assert_eq!(ranked[0].book.name, "John");
        assert_eq!(ranked[1].book.name, "1 John");
    }

    #[test]
    fn test_rank_ties_keep_insertion_order() {
        // With all weights zeroed every candidate ties
        let weights = ScoringWeights {
            title_exact: 0,
            title_contains: 0,
            book_contains: 0,
            book_similarity_scale: 0.0,
            kind_weights: KindWeights {
                verse: 0,
                chapter: 0,
                book: 0,
            },
        };
        let ranker = SearchRanker::new(weights);
        let results = vec![
            SearchResult::for_chapter(book("JHN"), 3),
            SearchResult::for_verse(book("JHN"), 3, 16),
            SearchResult::for_book(book("JHN"), "x"),
        ];
        let ranked = ranker.rank(results, "x");
        let kinds: Vec<_> = ranked.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![ResultKind::Chapter, ResultKind::Verse, ResultKind::Book]);
    }

    #[test]
    fn test_rank_empty() {
        let ranker = SearchRanker::default();
        assert!(ranker.rank(Vec::new(), "john").is_empty());
    }

    #[test]
    fn test_weights_deserialize_with_defaults() {
        let weights: ScoringWeights = serde_json::from_str(r#"{"title_exact": 200}"#).unwrap();
        assert_eq!(weights.title_exact, 200);
        assert_eq!(weights.title_contains, 50);
        assert_eq!(weights.kind_weights, KindWeights::default());
    }
}
