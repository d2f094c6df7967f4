//! Verse-content provider interface

use super::verse::Verse;
use crate::error::ProviderError;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashMap;

/// Source of verse text, keyed by `"{book}.{chapter}.{verse}"`.
///
/// One round trip per call; no batching is assumed.
pub trait VerseProvider: Send + Sync {
    fn fetch_verse<'a>(
        &'a self,
        reference: &'a str,
        translation_id: &'a str,
    ) -> BoxFuture<'a, Result<Verse, ProviderError>>;
}

/// Provider backed by a fixed map; ignores the translation
#[derive(Debug, Clone, Default)]
pub struct InMemoryVerseProvider {
    verses: HashMap<String, Verse>,
}

impl InMemoryVerseProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verse(mut self, id: &str, reference: &str, content: &str) -> Self {
        self.verses.insert(
            id.to_string(),
            Verse {
                reference: reference.to_string(),
                content: content.to_string(),
                id: id.to_string(),
            },
        );
        self
    }
}

impl VerseProvider for InMemoryVerseProvider {
    fn fetch_verse<'a>(
        &'a self,
        reference: &'a str,
        _translation_id: &'a str,
    ) -> BoxFuture<'a, Result<Verse, ProviderError>> {
        let result = self
            .verses
            .get(reference)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(reference.to_string()));
        futures::future::ready(result).boxed()
    }
}
