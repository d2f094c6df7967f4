//! Search result types

use super::parser::ReferenceCandidate;
use crate::catalog::{Book, BookId};
use serde::Serialize;

/// What a result points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Book,
    Chapter,
    Verse,
}

/// Where selecting a result should take the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Route {
    /// Expand the book in the overview and scroll to it
    ExpandBook { book: BookId },
    /// Open a chapter, optionally highlighting one verse
    Chapter {
        book: BookId,
        chapter: u32,
        highlight: Option<u32>,
    },
}

/// A single typed match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub kind: ResultKind,
    pub book: Book,
    pub chapter: Option<u32>,
    pub verse: Option<u32>,
    pub title: String,
    /// Verse text filled in by the prefetcher; absent until then
    pub preview: Option<String>,
    /// The normalized query that matched a book name
    pub matched_fragment: Option<String>,
}

impl SearchResult {
    pub fn for_book(book: Book, matched_fragment: &str) -> Self {
        Self {
            kind: ResultKind::Book,
            book,
            chapter: None,
            verse: None,
            title: book.name.to_string(),
            preview: None,
            matched_fragment: Some(matched_fragment.to_string()),
        }
    }

    pub fn for_chapter(book: Book, chapter: u32) -> Self {
        Self {
            kind: ResultKind::Chapter,
            book,
            chapter: Some(chapter),
            verse: None,
            title: format!("Chapter {}", chapter),
            preview: None,
            matched_fragment: None,
        }
    }

    pub fn for_verse(book: Book, chapter: u32, verse: u32) -> Self {
        Self {
            kind: ResultKind::Verse,
            book,
            chapter: Some(chapter),
            verse: Some(verse),
            title: format!("Verse {}", verse),
            preview: None,
            matched_fragment: None,
        }
    }

    /// The result a scoped reference maps to: a verse when one is given,
    /// otherwise the chapter.
    pub fn for_reference(candidate: &ReferenceCandidate) -> Self {
        match candidate.verse {
            Some(verse) => Self::for_verse(candidate.book, candidate.chapter, verse),
            None => Self::for_chapter(candidate.book, candidate.chapter),
        }
    }

    /// Breadcrumb for display, e.g. `John • 3:16`
    pub fn hierarchy_path(&self) -> String {
        match self.kind {
            ResultKind::Book => self.book.name.to_string(),
            ResultKind::Chapter => {
                format!("{} • Chapter {}", self.book.name, self.chapter.unwrap_or(1))
            }
            ResultKind::Verse => format!(
                "{} • {}:{}",
                self.book.name,
                self.chapter.unwrap_or(1),
                self.verse.unwrap_or(1)
            ),
        }
    }

    /// Secondary line shown under book results
    pub fn summary(&self) -> Option<String> {
        match self.kind {
            ResultKind::Book => Some(format!("{} chapters", self.book.chapter_count)),
            _ => None,
        }
    }

    /// Provider key `"{book}.{chapter}.{verse}"`, for verse results only
    pub fn verse_key(&self) -> Option<String> {
        match (self.kind, self.chapter, self.verse) {
            (ResultKind::Verse, Some(chapter), Some(verse)) => {
                Some(format!("{}.{}.{}", self.book.id, chapter, verse))
            }
            _ => None,
        }
    }

    pub fn route(&self) -> Route {
        match (self.kind, self.chapter) {
            (ResultKind::Book, _) | (_, None) => Route::ExpandBook { book: self.book.id },
            (ResultKind::Chapter, Some(chapter)) => Route::Chapter {
                book: self.book.id,
                chapter,
                highlight: None,
            },
            (ResultKind::Verse, Some(chapter)) => Route::Chapter {
                book: self.book.id,
                chapter,
                highlight: self.verse,
            },
        }
    }

    /// Fill in the preview. Only the first write sticks.
    pub fn set_preview(&mut self, text: String) -> bool {
        if self.preview.is_some() {
            return false;
        }
        self.preview = Some(text);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BookCatalog;

    fn john() -> Book {
        *BookCatalog::standard()
            .lookup("JHN".parse().unwrap())
            .unwrap()
    }

    #[test]
    fn test_titles() {
        assert_eq!(SearchResult::for_book(john(), "jo").title, "John");
        assert_eq!(SearchResult::for_chapter(john(), 3).title, "Chapter 3");
        assert_eq!(SearchResult::for_verse(john(), 3, 16).title, "Verse 16");
    }

    #[test]
    fn test_hierarchy_path_and_summary() {
        let book = SearchResult::for_book(john(), "jo");
        assert_eq!(book.hierarchy_path(), "John");
        assert_eq!(book.summary().as_deref(), Some("21 chapters"));
        assert_eq!(book.matched_fragment.as_deref(), Some("jo"));

        let chapter = SearchResult::for_chapter(john(), 3);
        assert_eq!(chapter.hierarchy_path(), "John • Chapter 3");
        assert!(chapter.summary().is_none());

        let verse = SearchResult::for_verse(john(), 3, 16);
        assert_eq!(verse.hierarchy_path(), "John • 3:16");
    }

    #[test]
    fn test_verse_key() {
        assert_eq!(
            SearchResult::for_verse(john(), 3, 16).verse_key().as_deref(),
            Some("JHN.3.16")
        );
        assert!(SearchResult::for_chapter(john(), 3).verse_key().is_none());
        assert!(SearchResult::for_book(john(), "john").verse_key().is_none());
    }

    #[test]
    fn test_routes() {
        let id = john().id;
        assert_eq!(
            SearchResult::for_book(john(), "john").route(),
            Route::ExpandBook { book: id }
        );
        assert_eq!(
            SearchResult::for_chapter(john(), 3).route(),
            Route::Chapter {
                book: id,
                chapter: 3,
                highlight: None
            }
        );
        assert_eq!(
            SearchResult::for_verse(john(), 3, 16).route(),
            Route::Chapter {
                book: id,
                chapter: 3,
                highlight: Some(16)
            }
        );
    }

    #[test]
    fn test_for_reference() {
        let candidate = ReferenceCandidate {
            book: john(),
            chapter: 3,
            verse: None,
        };
        assert_eq!(SearchResult::for_reference(&candidate).kind, ResultKind::Chapter);

        let candidate = ReferenceCandidate {
            verse: Some(16),
            ..candidate
        };
        assert_eq!(SearchResult::for_reference(&candidate).kind, ResultKind::Verse);
    }

    #[test]
    fn test_preview_written_once() {
        let mut verse = SearchResult::for_verse(john(), 3, 16);
        assert!(verse.set_preview("For God so loved the world".to_string()));
        assert!(!verse.set_preview("something else".to_string()));
        assert_eq!(verse.preview.as_deref(), Some("For God so loved the world"));
    }

    #[test]
    fn test_serializes_for_consumers() {
        let verse = SearchResult::for_verse(john(), 3, 16);
        let json = serde_json::to_value(&verse).unwrap();
        assert_eq!(json["kind"], "verse");
        assert_eq!(json["book"]["id"], "JHN");
        assert_eq!(json["title"], "Verse 16");
        assert!(json["preview"].is_null());
    }
}
