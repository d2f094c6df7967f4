//! Debounced search session
//!
//! The session owns the observable [`SearchState`]. Every keystroke bumps the
//! epoch; the debounce task, the search pass and each prefetched preview only
//! write while the epoch they were started under is still current.

use super::engine::SearchEngine;
use super::parser::ParseMode;
use super::prefetch::{apply_preview, ContentPrefetcher, PrefetchTarget};
use super::result::SearchResult;
use crate::bible::VerseProvider;
use crate::catalog::Book;
use crate::config::SearchConfig;
use crate::error::SessionError;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Debouncing,
    Searching,
    Resulted,
}

/// Snapshot of everything a view renders
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchState {
    pub query_text: String,
    pub results: Vec<SearchResult>,
    pub is_searching: bool,
    pub is_showing_results: bool,
    /// Verse previews for the current results are still being fetched
    pub is_prefetching: bool,
    pub scope: Option<Book>,
    pub phase: SessionPhase,
    /// Generation token, bumped on every query or scope change
    pub epoch: u64,
}

impl SearchState {
    fn reset(&mut self) {
        self.results.clear();
        self.is_searching = false;
        self.is_showing_results = false;
        self.is_prefetching = false;
        self.phase = SessionPhase::Idle;
    }
}

struct Shared {
    engine: SearchEngine,
    prefetcher: Option<ContentPrefetcher>,
    state: watch::Sender<SearchState>,
    translation_id: Mutex<String>,
    completed: AtomicUsize,
    prefetch_task: Mutex<Option<JoinHandle<()>>>,
}

impl Shared {
    /// The search pass for `epoch`; a no-op if the query moved on
    fn run_search(self: &Arc<Self>, epoch: u64) {
        let mut job = None;
        self.state.send_if_modified(|state| {
            if state.epoch != epoch {
                return false;
            }
            state.phase = SessionPhase::Searching;
            state.is_searching = true;
            state.is_showing_results = true;
            job = Some((state.query_text.clone(), state.scope));
            true
        });

        let Some((query, scope)) = job else {
            debug!("Skipping stale search for epoch {}", epoch);
            return;
        };

        let mode = scope.map_or(ParseMode::Unscoped, ParseMode::Scoped);
        let results = self.engine.search(&query, &mode);
        let targets = ContentPrefetcher::targets(&results);
        let count = results.len();

        let published = self.state.send_if_modified(|state| {
            if state.epoch != epoch {
                return false;
            }
            state.results = results;
            state.phase = SessionPhase::Resulted;
            state.is_searching = false;
            state.is_showing_results = true;
            state.is_prefetching = self.prefetcher.is_some() && !targets.is_empty();
            true
        });

        if !published {
            debug!("Discarded results for stale epoch {}", epoch);
            return;
        }

        self.completed.fetch_add(1, Ordering::Relaxed);
        info!("Search {:?} -> {} results", query, count);

        if !targets.is_empty() {
            self.start_prefetch(epoch, targets);
        }
    }

    fn start_prefetch(self: &Arc<Self>, epoch: u64, targets: Vec<PrefetchTarget>) {
        let Some(prefetcher) = self.prefetcher.clone() else {
            return;
        };
        let translation_id = self.translation_id();
        let shared = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let applied = prefetcher
                .run(targets, &translation_id, |target, text| {
                    shared.publish_preview(epoch, target, text)
                })
                .await;
            debug!("Prefetched {} previews for epoch {}", applied, epoch);
            shared.state.send_if_modified(|state| {
                if state.epoch != epoch || !state.is_prefetching {
                    return false;
                }
                state.is_prefetching = false;
                true
            });
        });

        if let Some(previous) = self.prefetch_slot().replace(handle) {
            previous.abort();
        }
    }

    fn publish_preview(&self, epoch: u64, target: &PrefetchTarget, text: String) -> bool {
        self.state.send_if_modified(|state| {
            state.epoch == epoch && apply_preview(&mut state.results, target, text)
        })
    }

    fn abort_prefetch(&self) {
        if let Some(task) = self.prefetch_slot().take() {
            task.abort();
        }
    }

    fn prefetch_slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.prefetch_task.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn translation_id(&self) -> String {
        self.translation_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Stateful, debounced query controller
pub struct SearchSession {
    shared: Arc<Shared>,
    debounce: Duration,
    runtime: Handle,
    debounce_task: Mutex<Option<JoinHandle<()>>>,
}

impl SearchSession {
    /// Create a session on the current tokio runtime, without previews
    pub fn new(engine: SearchEngine, config: &SearchConfig) -> Result<Self, SessionError> {
        Self::build(engine, config, None)
    }

    /// Create a session that prefetches verse previews from `provider`
    pub fn with_provider(
        engine: SearchEngine,
        config: &SearchConfig,
        provider: Arc<dyn VerseProvider>,
    ) -> Result<Self, SessionError> {
        Self::build(engine, config, Some(ContentPrefetcher::new(provider)))
    }

    fn build(
        engine: SearchEngine,
        config: &SearchConfig,
        prefetcher: Option<ContentPrefetcher>,
    ) -> Result<Self, SessionError> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        let (state, _) = watch::channel(SearchState::default());

        Ok(Self {
            shared: Arc::new(Shared {
                engine,
                prefetcher,
                state,
                translation_id: Mutex::new(config.translation_id.clone()),
                completed: AtomicUsize::new(0),
                prefetch_task: Mutex::new(None),
            }),
            debounce: config.debounce(),
            runtime,
            debounce_task: Mutex::new(None),
        })
    }

    /// Record a keystroke. A blank query goes straight back to idle.
    pub fn set_query(&self, text: &str) {
        let blank = text.trim().is_empty();
        let mut epoch = 0;
        self.shared.state.send_modify(|state| {
            state.epoch += 1;
            epoch = state.epoch;
            state.query_text = text.to_string();
            if blank {
                state.reset();
            } else {
                state.phase = SessionPhase::Debouncing;
                state.is_prefetching = false;
            }
        });

        self.cancel_pending();
        if blank {
            return;
        }

        let shared = Arc::clone(&self.shared);
        let debounce = self.debounce;
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(debounce).await;
            shared.run_search(epoch);
        });
        if let Some(previous) = self.debounce_slot().replace(handle) {
            previous.abort();
        }
    }

    /// Enter or leave a book. Any query and results are discarded.
    pub fn set_scope(&self, scope: Option<Book>) {
        self.shared.state.send_modify(|state| {
            state.epoch += 1;
            state.scope = scope;
            state.query_text.clear();
            state.reset();
        });
        self.cancel_pending();
    }

    pub fn clear(&self) {
        self.shared.state.send_modify(|state| {
            state.epoch += 1;
            state.query_text.clear();
            state.reset();
        });
        self.cancel_pending();
    }

    /// Translation used by later prefetches
    pub fn set_translation(&self, translation_id: &str) {
        *self
            .shared
            .translation_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = translation_id.to_string();
    }

    pub fn translation(&self) -> String {
        self.shared.translation_id()
    }

    pub fn state(&self) -> SearchState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.shared.state.subscribe()
    }

    /// Number of search passes that published results
    pub fn completed_searches(&self) -> usize {
        self.shared.completed.load(Ordering::Relaxed)
    }

    fn cancel_pending(&self) {
        if let Some(task) = self.debounce_slot().take() {
            task.abort();
        }
        self.shared.abort_prefetch();
    }

    fn debounce_slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.debounce_task.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
