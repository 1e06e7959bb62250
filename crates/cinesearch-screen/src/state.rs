//! Search screen state.
//!
//! The loading/error/results branching is a single enum, so a loading
//! screen can never carry stale results and an error never carries movies.

use cinesearch_api::tmdb::Movie;

/// Lifecycle of the most recent search.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchStatus {
    /// No search submitted yet.
    #[default]
    Idle,
    /// A search is in flight.
    Loading,
    /// The last search failed.
    Error {
        /// User-facing message.
        message: String,
    },
    /// The last search completed (possibly with zero results).
    Success {
        /// Movies in service order.
        results: Vec<Movie>,
    },
}

/// Complete observable state of the search screen.
#[derive(Debug, Clone, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchState {
    query: String,
    status: SearchStatus,
    selected: Option<Movie>,
}

impl SearchState {
    /// Creates the initial idle state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last accepted query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> &SearchStatus {
        &self.status
    }

    /// Whether a search is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, SearchStatus::Loading)
    }

    /// Results of the last successful search; empty in every other status.
    #[must_use]
    pub fn results(&self) -> &[Movie] {
        match &self.status {
            SearchStatus::Success { results } => results.as_slice(),
            _ => &[],
        }
    }

    /// Error message, present only in the error status.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            SearchStatus::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Movie currently shown in the detail modal.
    #[must_use]
    pub const fn selected(&self) -> Option<&Movie> {
        self.selected.as_ref()
    }

    /// Enters the loading status for `query`. Clears results, error and selection.
    pub(crate) fn start(&mut self, query: &str) {
        self.query = String::from(query);
        self.status = SearchStatus::Loading;
        self.selected = None;
    }

    /// Completes the search successfully.
    pub(crate) fn succeed(&mut self, results: Vec<Movie>) {
        self.status = SearchStatus::Success { results };
    }

    /// Completes the search with a failure.
    pub(crate) fn fail(&mut self, message: &str) {
        self.status = SearchStatus::Error {
            message: String::from(message),
        };
    }

    /// Selects `movie` if it is part of the current results.
    pub(crate) fn select(&mut self, movie: &Movie) -> bool {
        let found = self.results().iter().find(|m| m.id == movie.id).cloned();
        let accepted = found.is_some();
        if accepted {
            self.selected = found;
        }
        accepted
    }

    /// Clears the selection.
    pub(crate) fn clear_selection(&mut self) {
        self.selected = None;
    }
}
