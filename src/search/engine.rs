//! Search Engine Integration
//!
//! Ties together the catalog scan, reference parsing and ranking into a
//! single synchronous search pass.

use super::fuzzy::FuzzyMatcher;
use super::parser::{ParseMode, ReferenceCandidate, ReferenceParser, DEFAULT_BOOK_MATCH_THRESHOLD};
use super::ranking::{ScoringWeights, SearchRanker};
use super::result::SearchResult;
use crate::catalog::BookCatalog;
use crate::config::SearchConfig;
use std::sync::Arc;
use tracing::debug;

/// Default similarity a book name must exceed to show up as a book result
pub const DEFAULT_CATALOG_MATCH_THRESHOLD: f64 = 0.5;

/// Search engine that combines catalog scan, parsing, and ranking
#[derive(Debug, Clone)]
pub struct SearchEngine {
    catalog: Arc<BookCatalog>,
    parser: ReferenceParser,
    ranker: SearchRanker,
    catalog_match_threshold: f64,
}

impl SearchEngine {
    /// Create a new search engine with default thresholds and weights
    pub fn new(catalog: Arc<BookCatalog>) -> Self {
        Self {
            parser: ReferenceParser::with_threshold(catalog.clone(), DEFAULT_BOOK_MATCH_THRESHOLD),
            ranker: SearchRanker::new(ScoringWeights::default()),
            catalog_match_threshold: DEFAULT_CATALOG_MATCH_THRESHOLD,
            catalog,
        }
    }

    /// Create a search engine with thresholds and weights from `config`
    pub fn from_config(catalog: Arc<BookCatalog>, config: &SearchConfig) -> Self {
        Self {
            parser: ReferenceParser::with_threshold(catalog.clone(), config.book_match_threshold),
            ranker: SearchRanker::new(config.weights.clone()),
            catalog_match_threshold: config.catalog_match_threshold,
            catalog,
        }
    }

    pub fn catalog(&self) -> &Arc<BookCatalog> {
        &self.catalog
    }

    pub fn parser(&self) -> &ReferenceParser {
        &self.parser
    }

    /// Run one search pass and return results sorted by relevance.
    ///
    /// A blank query yields no results; callers treat that as idle rather
    /// than "nothing found".
    pub fn search(&self, query: &str, mode: &ParseMode) -> Vec<SearchResult> {
        let query = FuzzyMatcher::normalize(query.trim());
        if query.is_empty() {
            return Vec::new();
        }

        let candidates = self.candidates(&query, mode);
        let ranked = self.ranker.rank(candidates, &query);

        debug!("Search for {:?} produced {} results", query, ranked.len());
        ranked
    }

    /// Unranked candidates for a normalized query, in insertion order.
    ///
    /// Chapter candidates always precede the verse derived from the same
    /// reference. References outside the book's chapter range are dropped;
    /// a verse 0 keeps only its chapter.
    pub fn candidates(&self, query: &str, mode: &ParseMode) -> Vec<SearchResult> {
        match mode {
            ParseMode::Scoped(book) => ReferenceParser::parse_scoped(query, book)
                .into_iter()
                .filter_map(ReferenceCandidate::within_book)
                .map(|candidate| SearchResult::for_reference(&candidate))
                .collect(),
            ParseMode::Unscoped => {
                let mut results: Vec<SearchResult> = self
                    .catalog
                    .all_books()
                    .iter()
                    .filter(|book| {
                        let name = FuzzyMatcher::normalize(book.name);
                        name.contains(query)
                            || FuzzyMatcher::similarity(&name, query) > self.catalog_match_threshold
                    })
                    .map(|book| SearchResult::for_book(*book, query))
                    .collect();

                if let Some(reference) = self.parser.parse(query) {
                    match reference.clone().within_book() {
                        Some(reference) => {
                            results.push(SearchResult::for_chapter(reference.book, reference.chapter));
                            if let Some(verse) = reference.verse {
                                results.push(SearchResult::for_verse(
                                    reference.book,
                                    reference.chapter,
                                    verse,
                                ));
                            }
                        }
                        None => debug!(
                            "Dropping out-of-range reference {} {}:{:?}",
                            reference.book.id, reference.chapter, reference.verse
                        ),
                    }
                }

                results
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Book;
    use crate::search::result::ResultKind;

    fn engine() -> SearchEngine {
        SearchEngine::new(Arc::new(BookCatalog::standard()))
    }

    fn book(code: &str) -> Book {
        *BookCatalog::standard().lookup(code.parse().unwrap()).unwrap()
    }

    fn summary(results: &[SearchResult]) -> Vec<String> {
        results.iter().map(|r| r.hierarchy_path()).collect()
    }

    #[test]
    fn test_book_search() {
        let results = engine().search("Gen", &ParseMode::Unscoped);
        assert_eq!(summary(&results), vec!["Genesis"]);
        assert_eq!(results[0].matched_fragment.as_deref(), Some("gen"));
    }

    #[test]
    fn test_book_search_ranks_exact_title_first() {
        let results = engine().search("john", &ParseMode::Unscoped);
        assert_eq!(results[0].title, "John");
        // 1 John, 2 John and 3 John follow in canonical order
        assert_eq!(
            summary(&results[1..4]),
            vec!["1 John", "2 John", "3 John"]
        );
    }

    #[test]
    fn test_reference_search() {
        let results = engine().search("John 3:16", &ParseMode::Unscoped);
        assert_eq!(summary(&results), vec!["John • 3:16", "John • Chapter 3"]);
        assert_eq!(results[0].kind, ResultKind::Verse);
    }

    #[test]
    fn test_abbreviated_reference() {
        let results = engine().search("jn 3", &ParseMode::Unscoped);
        assert_eq!(summary(&results), vec!["John • Chapter 3"]);
    }

    #[test]
    fn test_chapter_precedes_verse_in_candidates() {
        let candidates = engine().candidates("john 3:16", &ParseMode::Unscoped);
        let kinds: Vec<_> = candidates.iter().map(|r| r.kind).collect();
        let chapter = kinds.iter().position(|k| *k == ResultKind::Chapter).unwrap();
        assert_eq!(kinds[chapter + 1], ResultKind::Verse);
    }

    #[test]
    fn test_out_of_range_chapter_dropped() {
        let results = engine().search("Genesis 999", &ParseMode::Unscoped);
        assert!(results.iter().all(|r| r.kind == ResultKind::Book));
    }

    #[test]
    fn test_verse_zero_keeps_chapter() {
        let results = engine().search("John 3:0", &ParseMode::Unscoped);
        assert_eq!(summary(&results), vec!["John • Chapter 3"]);

        let results = engine().search("3:0, 4:1", &ParseMode::Scoped(book("JHN")));
        let mut paths = summary(&results);
        paths.sort();
        assert_eq!(paths, vec!["John • 4:1", "John • Chapter 3"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(engine().search("qqqqqq", &ParseMode::Unscoped).is_empty());
        assert!(engine().search("   ", &ParseMode::Unscoped).is_empty());
    }

    #[test]
    fn test_scoped_search() {
        let results = engine().search("1, 2:3, 50", &ParseMode::Scoped(book("GEN")));
        let mut paths = summary(&results);
        paths.sort();
        assert_eq!(
            paths,
            vec!["Genesis • 2:3", "Genesis • Chapter 1", "Genesis • Chapter 50"]
        );
        // Verses outrank chapters on kind priority
        assert_eq!(results[0].kind, ResultKind::Verse);
    }

    #[test]
    fn test_scoped_search_ignores_book_names() {
        let results = engine().search("exodus", &ParseMode::Scoped(book("GEN")));
        assert!(results.is_empty());
    }

    #[test]
    fn test_scoped_search_filters_range() {
        let results = engine().search("1, 51", &ParseMode::Scoped(book("GEN")));
        assert_eq!(summary(&results), vec!["Genesis • Chapter 1"]);
    }

    #[test]
    fn test_deterministic() {
        let engine = engine();
        let first = engine.search("jo", &ParseMode::Unscoped);
        for _ in 0..10 {
            assert_eq!(engine.search("jo", &ParseMode::Unscoped), first);
        }
    }

    #[test]
    fn test_reduced_catalog() {
        let catalog = BookCatalog::new(vec![book("JHN"), book("1JN")]).unwrap();
        let engine = SearchEngine::new(Arc::new(catalog));
        let results = engine.search("john", &ParseMode::Unscoped);
        assert_eq!(summary(&results), vec!["John", "1 John"]);
    }
}
