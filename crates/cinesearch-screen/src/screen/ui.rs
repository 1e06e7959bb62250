//! TUI rendering logic for the search screen.

use cinesearch_api::tmdb::Movie;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::view::{Focus, ScreenView};
use crate::notify::{NoticeKind, ToastQueue};
use crate::state::{SearchState, SearchStatus};

/// Width of one grid card, including borders.
const CARD_WIDTH: u16 = 30;

/// Height of one grid card, including borders.
const CARD_HEIGHT: u16 = 5;

/// Maximum width of a toast.
const TOAST_WIDTH: u16 = 44;

/// Draws the search screen.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &SearchState, toasts: &ToastQueue, view: &mut ScreenView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search bar
            Constraint::Min(5),    // main content
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_search_bar(frame, chunks[0], state, view);

    match state.status() {
        SearchStatus::Idle => draw_hint(frame, chunks[1], "Type a movie title and press Enter."),
        SearchStatus::Loading => draw_loader(frame, chunks[1], state, view),
        SearchStatus::Error { message } => draw_error(frame, chunks[1], message),
        SearchStatus::Success { results } if results.is_empty() => {
            draw_hint(frame, chunks[1], "No movies to show. Try another title.");
        }
        SearchStatus::Success { results } => draw_grid(frame, chunks[1], results, view),
    }

    draw_footer(frame, chunks[2], state, view);

    if let Some(movie) = state.selected() {
        draw_modal(frame, movie);
    }

    draw_toasts(frame, toasts);
}

/// Draws the query input and a short status summary.
#[allow(clippy::indexing_slicing)]
fn draw_search_bar(frame: &mut Frame, area: Rect, state: &SearchState, view: &ScreenView) {
    let bar_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let input_style = if view.focus == Focus::Input && state.selected().is_none() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let input = Paragraph::new(view.input.as_str())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(" Search movies "));
    frame.render_widget(input, bar_chunks[0]);

    if view.focus == Focus::Input && state.selected().is_none() {
        let typed = u16::try_from(view.input.chars().count()).unwrap_or(u16::MAX);
        let max_x = bar_chunks[0]
            .x
            .saturating_add(bar_chunks[0].width.saturating_sub(2));
        let x = bar_chunks[0]
            .x
            .saturating_add(1)
            .saturating_add(typed)
            .min(max_x);
        frame.set_cursor_position((x, bar_chunks[0].y.saturating_add(1)));
    }

    let summary = match state.status() {
        SearchStatus::Idle => String::new(),
        SearchStatus::Loading => String::from("Searching..."),
        SearchStatus::Error { .. } => String::from("Search failed"),
        SearchStatus::Success { results } => format!("{} movies", results.len()),
    };
    let status = Paragraph::new(summary)
        .block(Block::default().borders(Borders::ALL).title(" cinesearch "));
    frame.render_widget(status, bar_chunks[1]);
}

/// Draws a centered hint in the main area.
fn draw_hint(frame: &mut Frame, area: Rect, text: &str) {
    let hint = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .centered()
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(hint, area);
}

/// Draws the loading indicator.
fn draw_loader(frame: &mut Frame, area: Rect, state: &SearchState, view: &ScreenView) {
    let text = format!("{} Searching for \"{}\"...", view.spinner(), state.query());
    let loader = Paragraph::new(text)
        .style(Style::default().fg(Color::Cyan))
        .centered()
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(loader, area);
}

/// Draws the error panel.
fn draw_error(frame: &mut Frame, area: Rect, message: &str) {
    let error = Paragraph::new(message)
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .centered()
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error "),
        );
    frame.render_widget(error, area);
}

/// Draws the results as a grid of cards, scrolled to keep the cursor visible.
fn draw_grid(frame: &mut Frame, area: Rect, results: &[Movie], view: &mut ScreenView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Movies ({}) ", results.len()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = usize::from((inner.width / CARD_WIDTH).max(1));
    let visible_rows = usize::from((inner.height / CARD_HEIGHT).max(1));
    view.columns = columns;
    view.cursor = view.cursor.min(results.len().saturating_sub(1));
    view.ensure_visible(visible_rows);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(inner);

    let has_focus = view.focus == Focus::Grid;
    for (row_offset, row_area) in row_areas.iter().enumerate() {
        let cell_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Length(CARD_WIDTH); columns])
            .split(*row_area);
        let row = view.scroll_row.saturating_add(row_offset);

        for (col, cell) in cell_areas.iter().enumerate() {
            let index = row.saturating_mul(columns).saturating_add(col);
            let Some(movie) = results.get(index) else {
                return;
            };
            draw_card(frame, *cell, movie, has_focus && index == view.cursor);
        }
    }
}

/// Draws one movie card.
fn draw_card(frame: &mut Frame, area: Rect, movie: &Movie, highlighted: bool) {
    let border_style = if highlighted {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let title_width = usize::from(area.width.saturating_sub(4));
    let year = movie.release_year().unwrap_or("----");
    let poster = if movie.poster_path.is_some() {
        Span::styled("poster", Style::default().fg(Color::Green))
    } else {
        Span::styled("no poster", Style::default().fg(Color::DarkGray))
    };

    let lines = vec![
        Line::from(format!("{year}  \u{2605} {:.1}", movie.vote_average)),
        Line::from(poster),
    ];

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ", truncate(&movie.title, title_width))),
    );
    frame.render_widget(card, area);
}

/// Draws the detail modal over the grid.
fn draw_modal(frame: &mut Frame, movie: &Movie) {
    let area = centered_rect(frame.area(), 70, 70);

    let label = Style::default().fg(Color::Yellow);
    let mut lines = vec![
        Line::from(Span::styled(
            movie.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Release date: ", label),
            Span::raw(movie.release_date.clone().unwrap_or_else(|| String::from("-"))),
        ]),
        Line::from(vec![
            Span::styled("Rating: ", label),
            Span::raw(format!(
                "{:.1}/10 ({} votes)",
                movie.vote_average, movie.vote_count
            )),
        ]),
        Line::from(""),
        Line::from(
            movie
                .overview_text()
                .unwrap_or("No overview available.")
                .to_owned(),
        ),
        Line::from(""),
    ];
    if let Some(url) = movie.backdrop_url().or_else(|| movie.poster_url()) {
        lines.push(Line::from(vec![
            Span::styled("Image: ", label),
            Span::raw(url),
        ]));
    }

    let modal = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Details ")
            .title_bottom(" Esc: close  o: open on TMDB "),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(modal, area);
}

/// Draws active toasts stacked in the top-right corner.
fn draw_toasts(frame: &mut Frame, toasts: &ToastQueue) {
    let screen = frame.area();
    let width = TOAST_WIDTH.min(screen.width);
    let x = screen.x.saturating_add(screen.width.saturating_sub(width));
    let mut y = screen.y;

    for toast in toasts.iter() {
        if y.saturating_add(3) > screen.bottom() {
            break;
        }
        let area = Rect::new(x, y, width, 3);
        let color = match toast.kind {
            NoticeKind::Info => Color::Green,
            NoticeKind::Error => Color::Red,
        };
        let widget = Paragraph::new(truncate(
            &toast.message,
            usize::from(width.saturating_sub(2)),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        frame.render_widget(Clear, area);
        frame.render_widget(widget, area);
        y = y.saturating_add(3);
    }
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &SearchState, view: &ScreenView) {
    let help_text = if state.selected().is_some() {
        "Esc/q/Enter: close  o: open on TMDB  Ctrl-C: quit"
    } else if view.focus == Focus::Grid && !state.results().is_empty() {
        "\u{2190}\u{2191}\u{2193}\u{2192}/hjkl: move  Enter: details  o: open  /: search  q: quit"
    } else {
        "Type a title  Enter: search  Tab: results  Esc: quit"
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Returns a rect of `percent_x` x `percent_y` centered in `area`.
#[allow(clippy::indexing_slicing)]
fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let margin_y = (100_u16.saturating_sub(percent_y)) / 2;
    let margin_x = (100_u16.saturating_sub(percent_x)) / 2;
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(margin_y),
            Constraint::Percentage(percent_y),
            Constraint::Percentage(margin_y),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(margin_x),
            Constraint::Percentage(percent_x),
            Constraint::Percentage(margin_x),
        ])
        .split(vertical[1])[1]
}

/// Shortens `text` to `max` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return String::from(text);
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('\u{2026}');
    out
}
