//! Canonical book catalog
//!
//! An immutable, ordered registry of the 66 canonical books. Consumers rely on
//! iteration order (Genesis through Revelation), so the catalog never reorders.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Three-character canonical book code, e.g. `GEN`, `1CO`, `JHN`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BookId([u8; 3]);

impl BookId {
    /// Build an id from a literal code. Callers must pass uppercase ASCII alphanumerics.
    pub const fn from_code(code: &[u8; 3]) -> Self {
        Self(*code)
    }

    pub fn as_str(&self) -> &str {
        // Constructors only admit ASCII, so this never fails
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookId {
    type Err = CatalogError;

    /// Case-insensitive: `"jhn"` parses to `JHN`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_alphanumeric()) {
            return Err(CatalogError::InvalidId(s.to_string()));
        }
        let mut code = [0u8; 3];
        for (slot, b) in code.iter_mut().zip(bytes) {
            *slot = b.to_ascii_uppercase();
        }
        Ok(Self(code))
    }
}

impl From<BookId> for String {
    fn from(id: BookId) -> Self {
        id.as_str().to_string()
    }
}

impl TryFrom<String> for BookId {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Testament {
    Old,
    New,
}

/// Traditional grouping of the canon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BookCategory {
    Pentateuch,
    Historical,
    Wisdom,
    MajorProphets,
    MinorProphets,
    Gospels,
    History,
    Pauline,
    General,
    Revelation,
}

impl BookCategory {
    pub fn testament(self) -> Testament {
        match self {
            BookCategory::Pentateuch
            | BookCategory::Historical
            | BookCategory::Wisdom
            | BookCategory::MajorProphets
            | BookCategory::MinorProphets => Testament::Old,
            _ => Testament::New,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BookCategory::Pentateuch => "Pentateuch",
            BookCategory::Historical => "Historical Books",
            BookCategory::Wisdom => "Wisdom Books",
            BookCategory::MajorProphets => "Major Prophets",
            BookCategory::MinorProphets => "Minor Prophets",
            BookCategory::Gospels => "Gospels",
            BookCategory::History => "History",
            BookCategory::Pauline => "Pauline Epistles",
            BookCategory::General => "General Epistles",
            BookCategory::Revelation => "Revelation",
        }
    }
}

/// A canonical book. Immutable once the catalog is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: BookId,
    pub name: &'static str,
    pub chapter_count: u32,
    pub order: u32,
    pub category: BookCategory,
}

impl Book {
    pub const fn new(
        id: BookId,
        name: &'static str,
        chapter_count: u32,
        order: u32,
        category: BookCategory,
    ) -> Self {
        Self {
            id,
            name,
            chapter_count,
            order,
            category,
        }
    }

    pub fn testament(&self) -> Testament {
        self.category.testament()
    }

    pub fn has_chapter(&self, chapter: u32) -> bool {
        (1..=self.chapter_count).contains(&chapter)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("Invalid book id: {0:?}")]
    InvalidId(String),
    #[error("Catalog must contain at least one book")]
    Empty,
    #[error("Duplicate book id: {0}")]
    DuplicateId(BookId),
    #[error("Book {0} has no chapters")]
    NoChapters(BookId),
    #[error("Book {id} breaks canonical order ({order} after {previous})")]
    OutOfOrder { id: BookId, order: u32, previous: u32 },
}

/// Ordered, read-only registry of books
#[derive(Debug, Clone)]
pub struct BookCatalog {
    books: Vec<Book>,
    index: HashMap<BookId, usize>,
}

impl BookCatalog {
    /// Build a catalog from books already in canonical order.
    ///
    /// Useful for reduced catalogs; rejects duplicates, empty books and
    /// non-increasing order.
    pub fn new(books: Vec<Book>) -> Result<Self, CatalogError> {
        if books.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut index = HashMap::with_capacity(books.len());
        let mut previous: Option<u32> = None;
        for (i, book) in books.iter().enumerate() {
            if book.chapter_count == 0 {
                return Err(CatalogError::NoChapters(book.id));
            }
            if let Some(previous) = previous {
                if book.order <= previous {
                    return Err(CatalogError::OutOfOrder {
                        id: book.id,
                        order: book.order,
                        previous,
                    });
                }
            }
            if index.insert(book.id, i).is_some() {
                return Err(CatalogError::DuplicateId(book.id));
            }
            previous = Some(book.order);
        }

        Ok(Self { books, index })
    }

    /// The 66-book Protestant canon
    pub fn standard() -> Self {
        let books = STANDARD_BOOKS.to_vec();
        let index = books.iter().enumerate().map(|(i, b)| (b.id, i)).collect();
        Self { books, index }
    }

    pub fn all_books(&self) -> &[Book] {
        &self.books
    }

    pub fn lookup(&self, id: BookId) -> Option<&Book> {
        self.index.get(&id).map(|&i| &self.books[i])
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn books_in(&self, category: BookCategory) -> impl Iterator<Item = &Book> {
        self.books.iter().filter(move |b| b.category == category)
    }

    pub fn books_in_testament(&self, testament: Testament) -> impl Iterator<Item = &Book> {
        self.books.iter().filter(move |b| b.testament() == testament)
    }

    /// The chapter following `chapter` of `id`, rolling over into the next book.
    ///
    /// Returns `None` past the last chapter of the last book or for unknown ids.
    pub fn next_chapter(&self, id: BookId, chapter: u32) -> Option<(&Book, u32)> {
        let i = *self.index.get(&id)?;
        let book = &self.books[i];
        if chapter < book.chapter_count {
            return Some((book, chapter + 1));
        }
        self.books.get(i + 1).map(|next| (next, 1))
    }
}

impl Default for BookCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

macro_rules! book {
    ($code:literal, $name:literal, $chapters:literal, $order:literal, $category:ident) => {
        Book::new(
            BookId::from_code($code),
            $name,
            $chapters,
            $order,
            BookCategory::$category,
        )
    };
}

static STANDARD_BOOKS: [Book; 66] = [
    book!(b"GEN", "Genesis", 50, 1, Pentateuch),
    book!(b"EXO", "Exodus", 40, 2, Pentateuch),
    book!(b"LEV", "Leviticus", 27, 3, Pentateuch),
    book!(b"NUM", "Numbers", 36, 4, Pentateuch),
    book!(b"DEU", "Deuteronomy", 34, 5, Pentateuch),
    book!(b"JOS", "Joshua", 24, 6, Historical),
    book!(b"JDG", "Judges", 21, 7, Historical),
    book!(b"RUT", "Ruth", 4, 8, Historical),
    book!(b"1SA", "1 Samuel", 31, 9, Historical),
    book!(b"2SA", "2 Samuel", 24, 10, Historical),
    book!(b"1KI", "1 Kings", 22, 11, Historical),
    book!(b"2KI", "2 Kings", 25, 12, Historical),
    book!(b"1CH", "1 Chronicles", 29, 13, Historical),
    book!(b"2CH", "2 Chronicles", 36, 14, Historical),
    book!(b"EZR", "Ezra", 10, 15, Historical),
    book!(b"NEH", "Nehemiah", 13, 16, Historical),
    book!(b"EST", "Esther", 10, 17, Historical),
    book!(b"JOB", "Job", 42, 18, Wisdom),
    book!(b"PSA", "Psalms", 150, 19, Wisdom),
    book!(b"PRO", "Proverbs", 31, 20, Wisdom),
    book!(b"ECC", "Ecclesiastes", 12, 21, Wisdom),
    book!(b"SNG", "Song of Solomon", 8, 22, Wisdom),
    book!(b"ISA", "Isaiah", 66, 23, MajorProphets),
    book!(b"JER", "Jeremiah", 52, 24, MajorProphets),
    book!(b"LAM", "Lamentations", 5, 25, MajorProphets),
    book!(b"EZK", "Ezekiel", 48, 26, MajorProphets),
    book!(b"DAN", "Daniel", 12, 27, MajorProphets),
    book!(b"HOS", "Hosea", 14, 28, MinorProphets),
    book!(b"JOL", "Joel", 3, 29, MinorProphets),
    book!(b"AMO", "Amos", 9, 30, MinorProphets),
    book!(b"OBA", "Obadiah", 1, 31, MinorProphets),
    book!(b"JON", "Jonah", 4, 32, MinorProphets),
    book!(b"MIC", "Micah", 7, 33, MinorProphets),
    book!(b"NAM", "Nahum", 3, 34, MinorProphets),
    book!(b"HAB", "Habakkuk", 3, 35, MinorProphets),
    book!(b"ZEP", "Zephaniah", 3, 36, MinorProphets),
    book!(b"HAG", "Haggai", 2, 37, MinorProphets),
    book!(b"ZEC", "Zechariah", 14, 38, MinorProphets),
    book!(b"MAL", "Malachi", 4, 39, MinorProphets),
    book!(b"MAT", "Matthew", 28, 40, Gospels),
    book!(b"MRK", "Mark", 16, 41, Gospels),
    book!(b"LUK", "Luke", 24, 42, Gospels),
    book!(b"JHN", "John", 21, 43, Gospels),
    book!(b"ACT", "Acts", 28, 44, History),
    book!(b"ROM", "Romans", 16, 45, Pauline),
    book!(b"1CO", "1 Corinthians", 16, 46, Pauline),
    book!(b"2CO", "2 Corinthians", 13, 47, Pauline),
    book!(b"GAL", "Galatians", 6, 48, Pauline),
    book!(b"EPH", "Ephesians", 6, 49, Pauline),
    book!(b"PHP", "Philippians", 4, 50, Pauline),
    book!(b"COL", "Colossians", 4, 51, Pauline),
    book!(b"1TH", "1 Thessalonians", 5, 52, Pauline),
    book!(b"2TH", "2 Thessalonians", 3, 53, Pauline),
    book!(b"1TI", "1 Timothy", 6, 54, Pauline),
    book!(b"2TI", "2 Timothy", 4, 55, Pauline),
    book!(b"TIT", "Titus", 3, 56, Pauline),
    book!(b"PHM", "Philemon", 1, 57, Pauline),
    book!(b"HEB", "Hebrews", 13, 58, General),
    book!(b"JAS", "James", 5, 59, General),
    book!(b"1PE", "1 Peter", 5, 60, General),
    book!(b"2PE", "2 Peter", 3, 61, General),
    book!(b"1JN", "1 John", 5, 62, General),
    book!(b"2JN", "2 John", 1, 63, General),
    book!(b"3JN", "3 John", 1, 64, General),
    book!(b"JUD", "Jude", 1, 65, General),
    book!(b"REV", "Revelation", 22, 66, Revelation),
];
