//! Search screen main loop.
//!
//! Uses `ratatui` + `crossterm` for rendering. Searches run as spawned
//! tasks and report back over a channel, so the loop keeps drawing the
//! spinner and handling keys while a request is in flight.

mod ui;
/// View state and key mapping.
pub mod view;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use cinesearch_api::tmdb::{Movie, TmdbApi};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use self::view::{ScreenAction, ScreenView};
use crate::controller::{SearchController, SearchOptions, SearchOutcome};
use crate::notify::{DEFAULT_TOAST_TTL, NotificationSink, ToastQueue};

/// Delay between loop iterations when no input is pending.
const TICK: Duration = Duration::from_millis(80);

/// Settings for one run of the search screen.
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    /// Options applied to every search.
    pub search: SearchOptions,
    /// How long toasts stay on screen.
    pub toast_ttl: Duration,
    /// Query submitted right after the screen opens.
    pub initial_query: Option<String>,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            search: SearchOptions::default(),
            toast_ttl: DEFAULT_TOAST_TTL,
            initial_query: None,
        }
    }
}

/// Completion of a spawned search.
#[derive(Debug)]
struct SearchReply {
    seq: u64,
    result: Result<Vec<Movie>>,
}

/// Runs the interactive search screen until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_search_screen<S>(service: Arc<S>, config: ScreenConfig) -> Result<()>
where
    S: TmdbApi + Sync + 'static,
{
    let toasts = ToastQueue::new(config.toast_ttl);
    let mut controller = SearchController::new(service, toasts, config.search);
    let mut view = ScreenView::new(config.initial_query.as_deref());
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel();

    if let Some(query) = config.initial_query.as_deref() {
        spawn_search(&mut controller, query, &reply_tx);
    }

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(
        &mut terminal,
        &mut controller,
        &mut view,
        &reply_tx,
        &mut reply_rx,
    )
    .await;

    // Cleanup (always attempt both steps even if event loop failed)
    let raw = disable_raw_mode().context("failed to disable raw mode");
    let alt = crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen");

    first_error(result, [raw, alt])
}

/// Returns `result` if it failed, otherwise the first failed cleanup step.
fn first_error(result: Result<()>, cleanup: [Result<()>; 2]) -> Result<()> {
    for step in cleanup {
        if let Err(err) = step {
            if result.is_err() {
                tracing::warn!(error = format!("{err:#}"), "terminal cleanup failed");
            } else {
                return Err(err);
            }
        }
    }
    result
}

/// Main event loop.
async fn run_event_loop<S>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &mut SearchController<S, ToastQueue>,
    view: &mut ScreenView,
    reply_tx: &UnboundedSender<SearchReply>,
    reply_rx: &mut UnboundedReceiver<SearchReply>,
) -> Result<()>
where
    S: TmdbApi + Sync + 'static,
{
    loop {
        while let Ok(reply) = reply_rx.try_recv() {
            apply_reply(controller, view, reply);
        }
        controller.notifier_mut().prune(Instant::now());
        view.tick();

        terminal
            .draw(|frame| {
                ui::draw(frame, controller.state(), controller.notifier(), view);
            })
            .context("failed to draw TUI")?;

        if !event::poll(Duration::ZERO).context("failed to poll events")? {
            tokio::time::sleep(TICK).await;
            continue;
        }

        if let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            let action = view.handle_key(controller.state(), key);
            if apply_action(controller, action, reply_tx) {
                return Ok(());
            }
        }
    }
}

/// Applies a finished search and resets the grid if it was not stale.
fn apply_reply<S, N: NotificationSink>(
    controller: &mut SearchController<S, N>,
    view: &mut ScreenView,
    reply: SearchReply,
) {
    let outcome = controller.finish_search(reply.seq, reply.result);
    tracing::debug!(seq = reply.seq, ?outcome, "search finished");
    if outcome != SearchOutcome::Stale {
        view.on_search_finished(controller.state());
    }
}

/// Carries out a key action. Returns `true` to exit.
fn apply_action<S>(
    controller: &mut SearchController<S, ToastQueue>,
    action: ScreenAction,
    reply_tx: &UnboundedSender<SearchReply>,
) -> bool
where
    S: TmdbApi + Sync + 'static,
{
    match action {
        ScreenAction::None => {}
        ScreenAction::Quit => return true,
        ScreenAction::Submit(query) => spawn_search(controller, &query, reply_tx),
        ScreenAction::Select(index) => {
            if let Some(movie) = controller.state().results().get(index).cloned() {
                controller.select(&movie);
            }
        }
        ScreenAction::CloseModal => controller.close_selection(),
        ScreenAction::Open(url) => {
            if let Err(err) = open::that(&url) {
                tracing::warn!(%url, error = %err, "failed to open browser");
            }
        }
    }
    false
}

/// Starts a search on a spawned task; the reply arrives on `reply_tx`.
fn spawn_search<S, N>(
    controller: &mut SearchController<S, N>,
    query: &str,
    reply_tx: &UnboundedSender<SearchReply>,
) where
    S: TmdbApi + Sync + 'static,
    N: NotificationSink,
{
    let Some(ticket) = controller.begin_search(query) else {
        return;
    };
    let service = controller.service();
    let reply_tx = reply_tx.clone();

    tokio::spawn(async move {
        let result = service
            .search_movie(ticket.params())
            .await
            .map(|response| response.results);
        // The receiver is gone only when the screen has already closed.
        let _ = reply_tx.send(SearchReply {
            seq: ticket.seq(),
            result,
        });
    });
}
