//! verse-search
//!
//! Fuzzy book-name matching and chapter/verse reference resolution over the
//! 66-book canon, a debounced search session, and verse preview prefetching
//! from a remote verse database.

pub mod bible;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod search;

pub use bible::{HttpVerseProvider, InMemoryVerseProvider, Verse, VerseProvider};
pub use catalog::{Book, BookCatalog, BookCategory, BookId, Testament};
pub use config::{ProviderConfig, SearchConfig};
pub use error::{ConfigError, ProviderError, SessionError};
pub use search::{
    ParseMode, ResultKind, Route, SearchEngine, SearchResult, SearchSession, SearchState,
    SessionPhase,
};
