//! Search and selection controller.
//!
//! A search runs in two halves so the terminal front end can keep handling
//! input while the request is in flight:
//!
//! 1. [`SearchController::begin_search`] validates the query, enters
//!    `Loading` and hands out a [`SearchTicket`].
//! 2. [`SearchController::finish_search`] applies the service result for that
//!    ticket and leaves `Loading`.
//!
//! [`SearchController::submit_query`] runs both halves back to back.
//!
//! Every accepted search gets a new sequence number. A completion whose
//! number is not the latest one issued is discarded, so a slow response can
//! never overwrite the results of a newer search.

use std::sync::Arc;

use anyhow::Result;
use cinesearch_api::tmdb::{LocalTmdbApi, Movie, SearchMovieParams};

use crate::notify::{NoticeKind, NotificationSink};
use crate::state::SearchState;

/// Notice shown when the query is empty or whitespace.
pub const EMPTY_QUERY_NOTICE: &str = "Please enter your search query.";

/// Notice shown when a search succeeds without results.
pub const NO_RESULTS_NOTICE: &str = "No movies found for your request.";

/// User-facing message for any service failure.
pub const SEARCH_FAILED_MESSAGE: &str = "There was an error, please try again...";

/// Request options applied to every search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Response language (e.g. "en-US").
    pub language: String,
    /// Include adult titles.
    pub include_adult: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            language: String::from("en-US"),
            include_adult: false,
        }
    }
}

/// Handle for one accepted search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    params: SearchMovieParams,
}

impl SearchTicket {
    /// Sequence number of this search.
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    /// Request parameters to send to the service.
    #[must_use]
    pub const fn params(&self) -> &SearchMovieParams {
        &self.params
    }
}

/// How a submitted query ended, as seen by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Rejected locally; no request was made.
    EmptyQuery,
    /// The service returned no movies.
    NoResults,
    /// The service returned this many movies.
    Found(usize),
    /// The service call failed.
    Failed,
    /// A newer search superseded this one; its result was dropped.
    Stale,
}

/// Owns the [`SearchState`] and every transition on it.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchController<S, N> {
    service: Arc<S>,
    notifier: N,
    options: SearchOptions,
    state: SearchState,
    last_seq: u64,
    in_flight: Option<u64>,
}

impl<S, N: NotificationSink> SearchController<S, N> {
    /// Creates a controller in the idle state.
    #[must_use]
    pub fn new(service: Arc<S>, notifier: N, options: SearchOptions) -> Self {
        Self {
            service,
            notifier,
            options,
            state: SearchState::new(),
            last_seq: 0,
            in_flight: None,
        }
    }

    /// Current screen state.
    #[must_use]
    pub const fn state(&self) -> &SearchState {
        &self.state
    }

    /// Shared handle to the search service.
    #[must_use]
    pub fn service(&self) -> Arc<S> {
        Arc::clone(&self.service)
    }

    /// The injected notification sink.
    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Mutable access to the notification sink (e.g. to expire toasts).
    pub const fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Starts a search for `query`.
    ///
    /// Returns `None` and raises the empty-query notice when the trimmed
    /// query is empty; the state is left untouched in that case.
    pub fn begin_search(&mut self, query: &str) -> Option<SearchTicket> {
        let query = query.trim();
        if query.is_empty() {
            self.notifier.notify(NoticeKind::Error, EMPTY_QUERY_NOTICE);
            return None;
        }

        self.last_seq = self.last_seq.saturating_add(1);
        let seq = self.last_seq;
        self.in_flight = Some(seq);
        self.state.start(query);
        tracing::debug!(seq, query, "movie search started");

        let params = SearchMovieParams::new(query)
            .language(self.options.language.clone())
            .include_adult(self.options.include_adult);
        Some(SearchTicket { seq, params })
    }

    /// Applies the service result for search `seq`.
    ///
    /// Results of superseded searches are dropped without touching the state.
    pub fn finish_search(&mut self, seq: u64, result: Result<Vec<Movie>>) -> SearchOutcome {
        if self.in_flight != Some(seq) {
            tracing::debug!(seq, latest = self.last_seq, "dropping stale search result");
            return SearchOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(movies) if movies.is_empty() => {
                self.notifier.notify(NoticeKind::Error, NO_RESULTS_NOTICE);
                self.state.succeed(movies);
                SearchOutcome::NoResults
            }
            Ok(movies) => {
                let count = movies.len();
                self.state.succeed(movies);
                SearchOutcome::Found(count)
            }
            Err(err) => {
                tracing::error!(seq, error = format!("{err:#}"), "movie search failed");
                self.state.fail(SEARCH_FAILED_MESSAGE);
                SearchOutcome::Failed
            }
        }
    }

    /// Opens the detail modal for `movie`.
    ///
    /// Returns `false` (and changes nothing) if the movie is not among the
    /// current results.
    pub fn select(&mut self, movie: &Movie) -> bool {
        self.state.select(movie)
    }

    /// Closes the detail modal.
    pub fn close_selection(&mut self) {
        self.state.clear_selection();
    }
}

impl<S: LocalTmdbApi, N: NotificationSink> SearchController<S, N> {
    /// Validates `query`, runs the search and applies its result.
    #[allow(clippy::future_not_send)]
    pub async fn submit_query(&mut self, query: &str) -> SearchOutcome {
        let Some(ticket) = self.begin_search(query) else {
            return SearchOutcome::EmptyQuery;
        };

        let result = self
            .service
            .search_movie(ticket.params())
            .await
            .map(|response| response.results);
        self.finish_search(ticket.seq(), result)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::anyhow;
    use cinesearch_api::tmdb::{SearchMovieResponse, TmdbApi};
    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;
    use crate::state::SearchStatus;
    use crate::state::tests::movie;

    /// Canned search service that counts calls.
    struct MockTmdb {
        movies: Option<Vec<Movie>>,
        calls: AtomicUsize,
        last_params: Mutex<Option<SearchMovieParams>>,
    }

    impl MockTmdb {
        fn returning(movies: Vec<Movie>) -> Arc<Self> {
            Arc::new(Self {
                movies: Some(movies),
                calls: AtomicUsize::new(0),
                last_params: Mutex::new(None),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                movies: None,
                calls: AtomicUsize::new(0),
                last_params: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TmdbApi for MockTmdb {
        async fn search_movie(&self, params: &SearchMovieParams) -> Result<SearchMovieResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_params.lock().unwrap() = Some(params.clone());
            self.movies.clone().map_or_else(
                || Err(anyhow!("request failed: search/movie: connection refused")),
                |results| {
                    Ok(SearchMovieResponse {
                        page: 1,
                        results,
                        total_pages: 1,
                        total_results: 0,
                    })
                },
            )
        }
    }

    /// Sink that records every notice.
    #[derive(Debug, Default)]
    struct RecordingSink {
        notices: Vec<(NoticeKind, String)>,
    }

    impl NotificationSink for RecordingSink {
        fn notify(&mut self, kind: NoticeKind, message: &str) {
            self.notices.push((kind, String::from(message)));
        }
    }

    impl RecordingSink {
        fn count(&self, message: &str) -> usize {
            self.notices.iter().filter(|(_, m)| m == message).count()
        }
    }

    fn batman_trilogy() -> Vec<Movie> {
        vec![
            movie(268, "Batman"),
            movie(364, "Batman Returns"),
            movie(272, "Batman Begins"),
        ]
    }

    fn controller(service: Arc<MockTmdb>) -> SearchController<MockTmdb, RecordingSink> {
        SearchController::new(service, RecordingSink::default(), SearchOptions::default())
    }

    #[tokio::test]
    async fn test_search_with_results() {
        // Arrange
        let service = MockTmdb::returning(batman_trilogy());
        let mut ctl = controller(Arc::clone(&service));

        // Act
        let outcome = ctl.submit_query("batman").await;

        // Assert
        assert_eq!(outcome, SearchOutcome::Found(3));
        assert_eq!(ctl.state().results().len(), 3);
        assert_eq!(ctl.state().results(), batman_trilogy().as_slice());
        assert!(matches!(ctl.state().status(), SearchStatus::Success { .. }));
        assert!(ctl.notifier().notices.is_empty());
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn test_whitespace_query_makes_no_call() {
        // Arrange
        let service = MockTmdb::returning(batman_trilogy());
        let mut ctl = controller(Arc::clone(&service));
        ctl.submit_query("batman").await;

        // Act
        let outcome = ctl.submit_query("   ").await;

        // Assert
        assert_eq!(outcome, SearchOutcome::EmptyQuery);
        assert_eq!(service.calls(), 1);
        assert_eq!(ctl.state().results().len(), 3);
        assert_eq!(ctl.state().query(), "batman");
        assert_eq!(ctl.notifier().count(EMPTY_QUERY_NOTICE), 1);
    }

    #[tokio::test]
    async fn test_empty_query_on_idle_stays_idle() {
        // Arrange
        let service = MockTmdb::returning(Vec::new());
        let mut ctl = controller(Arc::clone(&service));

        // Act
        let outcome = ctl.submit_query("").await;

        // Assert
        assert_eq!(outcome, SearchOutcome::EmptyQuery);
        assert_eq!(ctl.state().status(), &SearchStatus::Idle);
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_no_results_notifies_once() {
        // Arrange
        let service = MockTmdb::returning(Vec::new());
        let mut ctl = controller(service);

        // Act
        let outcome = ctl.submit_query("zzzznomatch").await;

        // Assert
        assert_eq!(outcome, SearchOutcome::NoResults);
        assert_eq!(
            ctl.state().status(),
            &SearchStatus::Success {
                results: Vec::new()
            }
        );
        assert_eq!(ctl.notifier().count(NO_RESULTS_NOTICE), 1);
        assert_eq!(ctl.notifier().notices.len(), 1);
    }

    #[tokio::test]
    async fn test_service_failure_sets_generic_error() {
        // Arrange
        let service = MockTmdb::failing();
        let mut ctl = controller(service);

        // Act
        let outcome = ctl.submit_query("batman").await;

        // Assert
        assert_eq!(outcome, SearchOutcome::Failed);
        assert_eq!(
            ctl.state().error_message(),
            Some("There was an error, please try again...")
        );
        assert!(ctl.state().results().is_empty());
        assert!(!ctl.state().is_loading());
        assert!(ctl.notifier().notices.is_empty());
    }

    #[tokio::test]
    async fn test_failure_after_success_clears_results() {
        // Arrange
        let mut ctl = controller(MockTmdb::returning(batman_trilogy()));
        ctl.submit_query("batman").await;
        let ticket = ctl.begin_search("joker").unwrap();

        // Act
        ctl.finish_search(ticket.seq(), Err(anyhow!("timeout")));

        // Assert
        assert!(ctl.state().results().is_empty());
        assert!(ctl.state().error_message().is_some());
    }

    #[test]
    fn test_failure_detail_only_goes_to_log() {
        // Arrange
        let mut ctl = controller(MockTmdb::failing());
        let ticket = ctl.begin_search("batman").unwrap();
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().at_level(tracing::Level::ERROR))
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || {
            ctl.finish_search(ticket.seq(), Err(anyhow!("HTTP 401: Invalid API key")));
        });

        // Assert
        handle.assert_finished();
        let message = ctl.state().error_message().unwrap();
        assert!(!message.contains("401"));
    }

    #[test]
    fn test_loading_only_between_begin_and_finish() {
        // Arrange
        let mut ctl = controller(MockTmdb::returning(Vec::new()));
        assert!(!ctl.state().is_loading());

        // Act
        let ticket = ctl.begin_search("batman").unwrap();
        let loading_while_pending = ctl.state().is_loading();
        ctl.finish_search(ticket.seq(), Ok(batman_trilogy()));

        // Assert
        assert!(loading_while_pending);
        assert!(!ctl.state().is_loading());
    }

    #[test]
    fn test_stale_result_is_dropped() {
        // Arrange
        let mut ctl = controller(MockTmdb::returning(Vec::new()));
        let first = ctl.begin_search("batman").unwrap();
        let second = ctl.begin_search("superman").unwrap();

        // Act: the older search answers first, then the newer one
        let stale = ctl.finish_search(first.seq(), Ok(batman_trilogy()));
        let still_loading = ctl.state().is_loading();
        let fresh = ctl.finish_search(second.seq(), Ok(vec![movie(1924, "Superman")]));
        let late_again = ctl.finish_search(first.seq(), Err(anyhow!("late failure")));

        // Assert
        assert_eq!(stale, SearchOutcome::Stale);
        assert!(still_loading);
        assert_eq!(fresh, SearchOutcome::Found(1));
        assert_eq!(late_again, SearchOutcome::Stale);
        assert_eq!(ctl.state().results()[0].title, "Superman");
        assert_eq!(ctl.state().query(), "superman");
    }

    #[test]
    fn test_ticket_carries_options_and_trimmed_query() {
        // Arrange
        let options = SearchOptions {
            language: String::from("uk-UA"),
            include_adult: true,
        };
        let mut ctl = SearchController::new(
            MockTmdb::returning(Vec::new()),
            RecordingSink::default(),
            options,
        );

        // Act
        let ticket = ctl.begin_search("  batman ").unwrap();

        // Assert
        assert_eq!(ticket.params().query, "batman");
        assert_eq!(ticket.params().language, "uk-UA");
        assert!(ticket.params().include_adult);
        assert!(ticket.seq() > 0);
    }

    #[tokio::test]
    async fn test_params_reach_service() {
        // Arrange
        let service = MockTmdb::returning(Vec::new());
        let mut ctl = controller(Arc::clone(&service));

        // Act
        ctl.submit_query("batman").await;

        // Assert
        let params = service.last_params.lock().unwrap().clone().unwrap();
        assert_eq!(params.query, "batman");
        assert_eq!(params.language, "en-US");
    }

    #[tokio::test]
    async fn test_select_then_close_round_trip() {
        // Arrange
        let mut ctl = controller(MockTmdb::returning(batman_trilogy()));
        ctl.submit_query("batman").await;
        let target = ctl.state().results()[1].clone();

        // Act
        let accepted = ctl.select(&target);
        let selected_id = ctl.state().selected().map(|m| m.id);
        ctl.close_selection();

        // Assert
        assert!(accepted);
        assert_eq!(selected_id, Some(364));
        assert!(ctl.state().selected().is_none());
    }

    #[tokio::test]
    async fn test_select_unknown_movie_is_refused() {
        // Arrange
        let mut ctl = controller(MockTmdb::returning(batman_trilogy()));
        ctl.submit_query("batman").await;

        // Act
        let accepted = ctl.select(&movie(1924, "Superman"));

        // Assert
        assert!(!accepted);
        assert!(ctl.state().selected().is_none());
    }

    #[test]
    fn test_select_while_idle_is_refused() {
        // Arrange
        let mut ctl = controller(MockTmdb::returning(Vec::new()));

        // Act & Assert
        assert!(!ctl.select(&movie(268, "Batman")));
    }
}
