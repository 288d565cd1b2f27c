use crate::models::book::BookRecord;
use crate::models::history::HistoryEntry;
use crate::models::query::{SearchQuery, SearchType};
use crate::models::state::{SearchFailure, SearchState};
use crate::models::storage::StorageError;
use crate::services::catalog::{CatalogError, SharedCatalog};
use crate::services::history::HistoryStore;
use tracing::{debug, error, info, warn};

/// What happened to one search attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Rejected before any request was made.
    Invalid,
    Found(usize),
    Empty,
    Failed,
    /// A newer search was started before this response arrived; it was dropped.
    Stale,
}

/// A validated search whose request has not run yet.
#[derive(Debug, Clone)]
pub struct PendingSearch {
    generation: u64,
    query: SearchQuery,
    limit: usize,
}

impl PendingSearch {
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Result cap in force when the search was started.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Runs the catalog request. Owns everything it needs so it can be spawned.
    pub async fn execute(self, catalog: SharedCatalog) -> CompletedSearch {
        let response = catalog.search(&self.query).await;
        CompletedSearch {
            generation: self.generation,
            query: self.query,
            limit: self.limit,
            response,
        }
    }
}

#[derive(Debug)]
pub struct CompletedSearch {
    generation: u64,
    query: SearchQuery,
    limit: usize,
    response: Result<Vec<BookRecord>, CatalogError>,
}

impl CompletedSearch {
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }
}

/// Owns the search screen state. All transitions go through `&mut self`, so
/// there is exactly one writer.
pub struct SearchController {
    catalog: SharedCatalog,
    history: HistoryStore,
    state: SearchState,
    results_limit: usize,
    generation: u64,
}

impl SearchController {
    pub fn new(catalog: SharedCatalog, history: HistoryStore, results_limit: usize) -> Self {
        Self {
            catalog,
            history,
            state: SearchState::default(),
            results_limit: results_limit.max(1),
            generation: 0,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn catalog(&self) -> SharedCatalog {
        self.catalog.clone()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    pub fn results_limit(&self) -> usize {
        self.results_limit
    }

    /// Applies to searches started after the call. Zero is ignored.
    pub fn set_results_limit(&mut self, limit: usize) -> bool {
        if limit == 0 {
            return false;
        }
        self.results_limit = limit;
        true
    }

    pub fn set_search_type(&mut self, search_type: SearchType) {
        self.state.search_type = search_type;
    }

    pub fn search_type(&self) -> SearchType {
        self.state.search_type
    }

    /// Validates the input and, if it is searchable, moves to the loading state
    /// and hands back the request to run.
    pub fn begin(&mut self, text: &str, search_type: SearchType) -> Option<PendingSearch> {
        self.state.query = text.to_string();
        self.state.search_type = search_type;

        let Some(query) = SearchQuery::new(text, search_type) else {
            self.state.error = Some(SearchFailure::Validation);
            return None;
        };

        self.generation += 1;
        self.state.error = None;
        self.state.loading = true;
        self.state.results.clear();
        self.state.selected = None;

        info!("Searching {} (request #{})", query, self.generation);
        Some(PendingSearch {
            generation: self.generation,
            query,
            limit: self.results_limit,
        })
    }

    /// Applies a finished request to the state unless a newer one has been
    /// started since.
    pub async fn finish(&mut self, completed: CompletedSearch) -> SearchOutcome {
        let CompletedSearch {
            generation,
            query,
            limit,
            response,
        } = completed;

        if generation != self.generation {
            debug!(
                "Discarding response for {} (request #{}, latest is #{})",
                query, generation, self.generation
            );
            return SearchOutcome::Stale;
        }

        let outcome = match response {
            Ok(records) if records.is_empty() => {
                info!("No results for {}", query);
                self.state.error = Some(SearchFailure::EmptyResult);
                SearchOutcome::Empty
            }
            Ok(records) => {
                let total = records.len();
                // A blank entry typed while this request was in flight may
                // have left a validation error behind.
                self.state.error = None;
                self.state.results = records.into_iter().take(limit).collect();
                info!(
                    "Found {} books for {} (showing {})",
                    total,
                    query,
                    self.state.results.len()
                );
                self.remember(query).await;
                SearchOutcome::Found(self.state.results.len())
            }
            Err(e) => {
                error!("Search error for {}: {}", query, e);
                self.state.error = Some(SearchFailure::Transport);
                SearchOutcome::Failed
            }
        };

        self.state.loading = false;
        outcome
    }

    pub async fn search(&mut self, text: &str, search_type: SearchType) -> SearchOutcome {
        match self.begin(text, search_type) {
            Some(pending) => {
                let completed = pending.execute(self.catalog.clone()).await;
                self.finish(completed).await
            }
            None => SearchOutcome::Invalid,
        }
    }

    /// Starts the search stored at `index` in the history (most recent first).
    pub fn begin_replay(&mut self, index: usize) -> Option<PendingSearch> {
        let query = self.history.get(index)?.query.clone();
        self.begin(query.text(), query.search_type())
    }

    pub async fn replay(&mut self, index: usize) -> Option<SearchOutcome> {
        let query = self.history.get(index)?.query.clone();
        Some(self.search(query.text(), query.search_type()).await)
    }

    pub async fn clear_history(&mut self) -> Result<(), StorageError> {
        self.history.clear().await
    }

    pub fn select(&mut self, index: usize) -> Option<&BookRecord> {
        if index >= self.state.results.len() {
            return None;
        }
        self.state.selected = Some(index);
        self.state.results.get(index)
    }

    pub fn clear_selection(&mut self) {
        self.state.selected = None;
    }

    async fn remember(&mut self, query: SearchQuery) {
        if let Err(e) = self.history.record(query).await {
            warn!("Could not persist search history: {}", e);
        }
    }
}
