//! Book and reference search
//!
//! Fuzzy book matching, reference parsing and ranking, plus the debounced
//! session that drives them and the preview prefetcher.

pub mod engine;
pub mod fuzzy;
pub mod parser;
pub mod prefetch;
pub mod ranking;
pub mod result;
pub mod session;


pub use engine::SearchEngine;
pub use fuzzy::FuzzyMatcher;
pub use parser::{ParseMode, ReferenceCandidate, ReferenceParser};
pub use prefetch::{ContentPrefetcher, PrefetchTarget};
pub use ranking::{MatchScore, ScoringWeights, SearchRanker};
pub use result::{ResultKind, Route, SearchResult};
pub use session::{SearchSession, SearchState, SessionPhase};
