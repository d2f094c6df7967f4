//! Reference Parser
//!
//! Recognizes `<book fragment> <chapter>[:<verse>]` against the catalog, and
//! bare `<chapter>[:<verse>]` lists when the search is scoped to one book.
//! The grammar is permissive on purpose; strictness lives in the fuzzy
//! threshold used to resolve the book fragment.

use super::fuzzy::FuzzyMatcher;
use crate::catalog::{Book, BookCatalog};
use regex::Regex;
use std::sync::{Arc, LazyLock};

static RE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.+?)\s+(\d+)(?::(\d+))?\s*$").expect("valid reference regex")
});
static RE_SCOPED_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?::(\d+))?$").expect("valid scoped segment regex"));

/// Default similarity a book name must exceed to resolve a fragment
pub const DEFAULT_BOOK_MATCH_THRESHOLD: f64 = 0.4;

/// How a query is interpreted
#[derive(Debug, Clone, PartialEq)]
pub enum ParseMode {
    /// Book names are part of the query
    Unscoped,
    /// The user is inside one book; queries are chapter/verse lists
    Scoped(Book),
}

/// A parsed reference, not yet validated against the book's chapter count
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCandidate {
    pub book: Book,
    pub chapter: u32,
    pub verse: Option<u32>,
}

impl ReferenceCandidate {
    /// Whether the reference points inside the book
    pub fn is_resolvable(&self) -> bool {
        self.book.has_chapter(self.chapter) && self.verse.is_none_or(|v| v >= 1)
    }

    /// The part of the reference that exists in the book: a chapter past the
    /// end drops the whole reference, verse 0 falls back to the chapter.
    pub fn within_book(self) -> Option<Self> {
        if !self.book.has_chapter(self.chapter) {
            return None;
        }
        Some(Self {
            verse: self.verse.filter(|&v| v >= 1),
            ..self
        })
    }
}

/// Reference parser bound to a catalog
#[derive(Debug, Clone)]
pub struct ReferenceParser {
    catalog: Arc<BookCatalog>,
    book_match_threshold: f64,
}

impl ReferenceParser {
    pub fn new(catalog: Arc<BookCatalog>) -> Self {
        Self::with_threshold(catalog, DEFAULT_BOOK_MATCH_THRESHOLD)
    }

    pub fn with_threshold(catalog: Arc<BookCatalog>, book_match_threshold: f64) -> Self {
        Self {
            catalog,
            book_match_threshold,
        }
    }

    /// Parse according to `mode`, returning every candidate found
    pub fn parse_with_mode(&self, query: &str, mode: &ParseMode) -> Vec<ReferenceCandidate> {
        match mode {
            ParseMode::Unscoped => self.parse(query).into_iter().collect(),
            ParseMode::Scoped(book) => Self::parse_scoped(query, book),
        }
    }

    /// Parse `"<book fragment> <chapter>[:<verse>]"`
    ///
    /// Returns `None` when the shape does not match, the numbers overflow, or
    /// no book resolves. None of these are errors.
    pub fn parse(&self, query: &str) -> Option<ReferenceCandidate> {
        let captures = RE_REFERENCE.captures(query.trim())?;

        let fragment = captures.get(1)?.as_str();
        let chapter = captures.get(2)?.as_str().parse::<u32>().ok()?;
        let verse = match captures.get(3) {
            Some(m) => Some(m.as_str().parse::<u32>().ok()?),
            None => None,
        };

        let book = self.best_matching_book(fragment)?;

        Some(ReferenceCandidate {
            book: *book,
            chapter,
            verse,
        })
    }

    /// Parse a comma-separated `"<chapter>[:<verse>]"` list inside `book`.
    ///
    /// Segments that do not match are dropped individually.
    pub fn parse_scoped(query: &str, book: &Book) -> Vec<ReferenceCandidate> {
        query
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .filter_map(|segment| {
                let captures = RE_SCOPED_SEGMENT.captures(segment)?;
                let chapter = captures.get(1)?.as_str().parse::<u32>().ok()?;
                let verse = match captures.get(2) {
                    Some(m) => Some(m.as_str().parse::<u32>().ok()?),
                    None => None,
                };
                Some(ReferenceCandidate {
                    book: *book,
                    chapter,
                    verse,
                })
            })
            .collect()
    }

    /// Resolve a free-form book fragment to a catalog book.
    ///
    /// A book whose name contains the fragment qualifies outright; the best of
    /// those wins. Otherwise the most similar book must exceed the threshold.
    /// Ties go to the earlier book in canonical order.
    pub fn best_matching_book(&self, fragment: &str) -> Option<&Book> {
        let needle = FuzzyMatcher::normalize(fragment.trim());
        if needle.is_empty() {
            return None;
        }

        let mut best_containing: Option<(&Book, f64)> = None;
        let mut best_overall: Option<(&Book, f64)> = None;

        for book in self.catalog.all_books() {
            let name = FuzzyMatcher::normalize(book.name);
            let score = FuzzyMatcher::similarity(&name, &needle);

            if name.contains(&needle) && best_containing.is_none_or(|(_, s)| score > s) {
                best_containing = Some((book, score));
            }
            if best_overall.is_none_or(|(_, s)| score > s) {
                best_overall = Some((book, score));
            }
        }

        if let Some((book, _)) = best_containing {
            return Some(book);
        }

        best_overall
            .filter(|&(_, score)| score > self.book_match_threshold)
            .map(|(book, _)| book)
    }
}
