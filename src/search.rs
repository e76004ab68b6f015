use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::debounce::Debouncer;
use crate::models::ContentItem;
use crate::routes::Route;
use crate::tmdb::TmdbApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub debounce: Duration,
    pub min_chars: usize,
    pub limit: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            min_chars: 2,
            limit: None,
        }
    }
}

impl SearchOptions {
    /// Quick-jump palette: snappier timer, longer minimum, short list.
    pub fn palette() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_chars: 3,
            limit: Some(8),
        }
    }

    fn is_searchable(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.min_chars
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPhase {
    #[default]
    Idle,
    Debouncing,
    Searching,
    Results,
    Empty,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Empty,
    Results(Vec<ContentItem>),
    Error(String),
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    pub phase: SearchPhase,
    pub results: Vec<ContentItem>,
    pub selected: Option<usize>,
    pub error: Option<String>,
    pub generation: u64,
}

impl SearchState {
    pub fn selected_item(&self) -> Option<&ContentItem> {
        self.selected.and_then(|i| self.results.get(i))
    }

    fn apply(&mut self, outcome: SearchOutcome) {
        match outcome {
            SearchOutcome::Empty => {
                self.phase = SearchPhase::Empty;
                self.results.clear();
                self.selected = None;
                self.error = None;
            }
            SearchOutcome::Results(results) => {
                self.phase = SearchPhase::Results;
                self.results = results;
                self.selected = None;
                self.error = None;
            }
            // the previous result set stays on screen under the error
            SearchOutcome::Error(message) => {
                self.phase = SearchPhase::Error;
                self.error = Some(message);
            }
        }
    }
}

/// One multi-search round trip with the length guard and result limit
/// applied. Person entries never reach here: the client only yields movie
/// and tv items.
pub async fn run_search(api: &dyn TmdbApi, query: &str, options: &SearchOptions) -> SearchOutcome {
    if !options.is_searchable(query) {
        return SearchOutcome::Empty;
    }
    match api.search_multi(query.trim()).await {
        Ok(mut items) => {
            if let Some(limit) = options.limit {
                items.truncate(limit);
            }
            if items.is_empty() {
                SearchOutcome::Empty
            } else {
                SearchOutcome::Results(items)
            }
        }
        Err(e) => {
            warn!(query = %query, "Search failed: {:#}", e);
            SearchOutcome::Error("Failed to search content. Please try again.".to_string())
        }
    }
}

/// Search-as-you-type. Every input bumps a generation counter and restarts
/// the debounce timer; a response is applied only if its generation is still
/// the latest.
pub struct SearchController {
    api: Arc<dyn TmdbApi>,
    options: SearchOptions,
    state: Arc<Mutex<SearchState>>,
    debouncer: Debouncer,
}

impl SearchController {
    pub fn new(api: Arc<dyn TmdbApi>, options: SearchOptions) -> Self {
        Self {
            api,
            debouncer: Debouncer::new(options.debounce),
            options,
            state: Arc::new(Mutex::new(SearchState::default())),
        }
    }

    pub async fn input(&mut self, query: impl Into<String>) {
        let query = query.into();
        let generation = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.query = query.clone();
            state.phase = SearchPhase::Debouncing;
            state.generation
        };

        let api = self.api.clone();
        let state = self.state.clone();
        let options = self.options;
        self.debouncer.call(async move {
            {
                let mut s = state.lock().await;
                if s.generation != generation {
                    return;
                }
                if !options.is_searchable(&query) {
                    s.apply(SearchOutcome::Empty);
                    return;
                }
                s.phase = SearchPhase::Searching;
            }

            debug!(query = %query, generation, "Issuing search");
            let outcome = run_search(api.as_ref(), &query, &options).await;

            let mut s = state.lock().await;
            if s.generation != generation {
                debug!(
                    query = %query,
                    generation,
                    latest = s.generation,
                    "Discarding stale search response"
                );
                return;
            }
            s.apply(outcome);
        });
    }

    /// Clears query and results; anything in flight becomes stale.
    pub async fn reset(&mut self) {
        self.debouncer.cancel();
        let mut state = self.state.lock().await;
        let generation = state.generation + 1;
        *state = SearchState {
            generation,
            ..SearchState::default()
        };
    }

    pub async fn snapshot(&self) -> SearchState {
        self.state.lock().await.clone()
    }

    pub async fn select(&self, index: usize) -> Option<ContentItem> {
        let mut state = self.state.lock().await;
        let item = state.results.get(index).cloned()?;
        state.selected = Some(index);
        Some(item)
    }

    pub async fn select_next(&self) -> Option<ContentItem> {
        let mut state = self.state.lock().await;
        let last = state.results.len().checked_sub(1)?;
        let next = match state.selected {
            Some(i) => (i + 1).min(last),
            None => 0,
        };
        state.selected = Some(next);
        state.results.get(next).cloned()
    }

    pub async fn select_previous(&self) -> Option<ContentItem> {
        let mut state = self.state.lock().await;
        if state.results.is_empty() {
            return None;
        }
        let prev = state.selected.map(|i| i.saturating_sub(1)).unwrap_or(0);
        state.selected = Some(prev);
        state.results.get(prev).cloned()
    }

    pub async fn clear_selection(&self) {
        self.state.lock().await.selected = None;
    }

    /// Detail route for the current selection.
    pub async fn selected_route(&self) -> Option<Route> {
        let state = self.state.lock().await;
        state.selected_item().map(Route::for_item)
    }
}
