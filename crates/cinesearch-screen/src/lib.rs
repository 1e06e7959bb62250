//! Search screen for cinesearch.
//!
//! Holds the observable [`state::SearchState`], the
//! [`controller::SearchController`] that drives it, the notification sinks
//! for transient notices, and the ratatui front end that renders it all.

/// Search and selection controller.
pub mod controller;
/// Transient notices.
pub mod notify;
/// Terminal front end.
pub mod screen;
/// Observable screen state.
pub mod state;

pub use controller::{
    EMPTY_QUERY_NOTICE, NO_RESULTS_NOTICE, SEARCH_FAILED_MESSAGE, SearchController, SearchOptions,
    SearchOutcome, SearchTicket,
};
pub use notify::{LogSink, NoticeKind, NotificationSink, ToastQueue};
pub use screen::{ScreenConfig, run_search_screen};
pub use state::{SearchState, SearchStatus};
