//! Verse preview prefetching
//!
//! After a result list is published, every verse result gets one fetch against
//! the [`VerseProvider`]. Responses arrive in any order and are handed back one
//! at a time; the caller decides whether the slot is still current.

use super::result::SearchResult;
use crate::bible::VerseProvider;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tracing::debug;

/// One verse slot to fill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefetchTarget {
    /// Position of the result in the published list
    pub index: usize,
    /// Provider key, e.g. `"JHN.3.16"`
    pub key: String,
}

#[derive(Clone)]
pub struct ContentPrefetcher {
    provider: Arc<dyn VerseProvider>,
}

impl ContentPrefetcher {
    pub fn new(provider: Arc<dyn VerseProvider>) -> Self {
        Self { provider }
    }

    /// Verse results without a preview, in list order
    pub fn targets(results: &[SearchResult]) -> Vec<PrefetchTarget> {
        results
            .iter()
            .enumerate()
            .filter(|(_, result)| result.preview.is_none())
            .filter_map(|(index, result)| {
                result.verse_key().map(|key| PrefetchTarget { index, key })
            })
            .collect()
    }

    /// Fetch all targets concurrently, calling `apply` with the cleaned text of
    /// each success as it completes. Returns how many `apply` calls accepted.
    pub async fn run<F>(&self, targets: Vec<PrefetchTarget>, translation_id: &str, mut apply: F) -> usize
    where
        F: FnMut(&PrefetchTarget, String) -> bool,
    {
        let mut pending: FuturesUnordered<_> = targets
            .iter()
            .map(|target| async move {
                let result = self.provider.fetch_verse(&target.key, translation_id).await;
                (target, result)
            })
            .collect();

        let mut applied = 0;
        while let Some((target, result)) = pending.next().await {
            match result {
                Ok(verse) => {
                    if apply(target, verse.cleaned_text()) {
                        applied += 1;
                    } else {
                        debug!("Discarded stale preview for {}", target.key);
                    }
                }
                Err(e) => debug!("Preview fetch for {} failed: {}", target.key, e),
            }
        }
        applied
    }
}

/// Write `text` into `results[target.index]` if that slot still holds the same
/// verse and has no preview yet.
pub fn apply_preview(results: &mut [SearchResult], target: &PrefetchTarget, text: String) -> bool {
    match results.get_mut(target.index) {
        Some(slot) if slot.verse_key().as_deref() == Some(target.key.as_str()) => {
            slot.set_preview(text)
        }
        _ => false,
    }
}
