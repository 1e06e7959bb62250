//! Presentation-only state of the search screen: the query being typed,
//! keyboard focus and the grid cursor.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::state::SearchState;

/// Spinner frames shown while a search is in flight.
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Which widget receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The query input.
    Input,
    /// The results grid.
    Grid,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenAction {
    /// Nothing beyond the view update already made.
    None,
    /// Leave the screen.
    Quit,
    /// Submit this query.
    Submit(String),
    /// Open the detail modal for the result at this index.
    Select(usize),
    /// Close the detail modal.
    CloseModal,
    /// Open this URL in the browser.
    Open(String),
}

/// View state owned by the event loop.
#[derive(Debug)]
pub struct ScreenView {
    /// Text in the query input.
    pub input: String,
    /// Current focus.
    pub focus: Focus,
    /// Index of the highlighted result.
    pub cursor: usize,
    /// Grid columns at the last draw.
    pub columns: usize,
    /// First grid row drawn at the last draw.
    pub scroll_row: usize,
    /// Frame counter for the spinner.
    tick: usize,
}

impl ScreenView {
    /// Creates the view with an optional pre-filled query.
    #[must_use]
    pub fn new(initial_query: Option<&str>) -> Self {
        Self {
            input: initial_query.map(String::from).unwrap_or_default(),
            focus: Focus::Input,
            cursor: 0,
            columns: 1,
            scroll_row: 0,
            tick: 0,
        }
    }

    /// Advances the spinner.
    pub const fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Current spinner frame.
    #[must_use]
    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES
            .get(self.tick % SPINNER_FRAMES.len())
            .copied()
            .unwrap_or("*")
    }

    /// Resets the grid after a search completed.
    pub fn on_search_finished(&mut self, state: &SearchState) {
        self.cursor = 0;
        self.scroll_row = 0;
        self.focus = if state.results().is_empty() {
            Focus::Input
        } else {
            Focus::Grid
        };
    }

    /// Maps a key press to a view update and an action for the loop.
    pub fn handle_key(&mut self, state: &SearchState, key: KeyEvent) -> ScreenAction {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return ScreenAction::Quit;
        }

        if let Some(movie) = state.selected() {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                    ScreenAction::CloseModal
                }
                KeyCode::Char('o') => ScreenAction::Open(movie.tmdb_url()),
                _ => ScreenAction::None,
            };
        }

        let result_count = state.results().len();
        if self.focus == Focus::Grid && result_count > 0 {
            self.handle_grid_key(state, key.code, result_count)
        } else {
            self.handle_input_key(key, result_count)
        }
    }

    /// Handles keys while the query input has focus.
    fn handle_input_key(&mut self, key: KeyEvent, result_count: usize) -> ScreenAction {
        match key.code {
            KeyCode::Enter => return ScreenAction::Submit(self.input.clone()),
            KeyCode::Esc if result_count == 0 => return ScreenAction::Quit,
            KeyCode::Esc | KeyCode::Tab | KeyCode::Down if result_count > 0 => {
                self.focus = Focus::Grid;
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
            }
            _ => {}
        }
        ScreenAction::None
    }

    /// Handles keys while the results grid has focus.
    fn handle_grid_key(
        &mut self,
        state: &SearchState,
        key: KeyCode,
        result_count: usize,
    ) -> ScreenAction {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return ScreenAction::Quit,
            KeyCode::Enter | KeyCode::Char(' ') => return ScreenAction::Select(self.cursor),
            KeyCode::Char('o') => {
                if let Some(movie) = state.results().get(self.cursor) {
                    return ScreenAction::Open(movie.tmdb_url());
                }
            }
            KeyCode::Char('/' | 'i') | KeyCode::Tab => self.focus = Focus::Input,
            KeyCode::Left | KeyCode::Char('h') => self.move_left(),
            KeyCode::Right | KeyCode::Char('l') => self.move_right(result_count),
            KeyCode::Up | KeyCode::Char('k') => self.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(result_count),
            _ => {}
        }
        ScreenAction::None
    }

    /// Moves the cursor one card left.
    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the cursor one card right.
    pub const fn move_right(&mut self, len: usize) {
        if self.cursor.saturating_add(1) < len {
            self.cursor = self.cursor.saturating_add(1);
        }
    }

    /// Moves the cursor one row up.
    pub fn move_up(&mut self) {
        if self.cursor >= self.columns {
            self.cursor = self.cursor.saturating_sub(self.columns.max(1));
        }
    }

    /// Moves the cursor one row down, stopping at the last card.
    pub fn move_down(&mut self, len: usize) {
        let target = self.cursor.saturating_add(self.columns.max(1));
        if target < len {
            self.cursor = target;
        } else if self.cursor / self.columns.max(1) < len.saturating_sub(1) / self.columns.max(1)
        {
            self.cursor = len.saturating_sub(1);
        }
    }

    /// Adjusts `scroll_row` so the cursor row is within `visible_rows`.
    pub fn ensure_visible(&mut self, visible_rows: usize) {
        let row = self.cursor / self.columns.max(1);
        let visible_rows = visible_rows.max(1);
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row.saturating_add(visible_rows) {
            self.scroll_row = row.saturating_sub(visible_rows.saturating_sub(1));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::state::tests::movie;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_state(count: u64) -> SearchState {
        let mut state = SearchState::new();
        state.start("batman");
        state.succeed((1..=count).map(|id| movie(id, "Batman")).collect());
        state
    }

    #[test]
    fn test_typing_and_submit() {
        // Arrange
        let state = SearchState::new();
        let mut view = ScreenView::new(None);

        // Act
        for c in "bat".chars() {
            view.handle_key(&state, key(KeyCode::Char(c)));
        }
        view.handle_key(&state, key(KeyCode::Backspace));
        let action = view.handle_key(&state, key(KeyCode::Enter));

        // Assert
        assert_eq!(action, ScreenAction::Submit(String::from("ba")));
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        // Arrange
        let state = loaded_state(3);
        let mut view = ScreenView::new(None);
        view.on_search_finished(&state);

        // Act
        let action = view.handle_key(
            &state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );

        // Assert
        assert_eq!(action, ScreenAction::Quit);
    }

    #[test]
    fn test_results_focus_grid_and_select() {
        // Arrange
        let state = loaded_state(5);
        let mut view = ScreenView::new(Some("batman"));
        view.columns = 2;

        // Act
        view.on_search_finished(&state);
        view.handle_key(&state, key(KeyCode::Right));
        view.handle_key(&state, key(KeyCode::Down));
        let action = view.handle_key(&state, key(KeyCode::Enter));

        // Assert
        assert_eq!(view.focus, Focus::Grid);
        assert_eq!(action, ScreenAction::Select(3));
    }

    #[test]
    fn test_modal_keys_close_and_open() {
        // Arrange
        let mut state = loaded_state(2);
        state.select(&movie(2, "Batman"));
        let mut view = ScreenView::new(None);

        // Act
        let open = view.handle_key(&state, key(KeyCode::Char('o')));
        let close = view.handle_key(&state, key(KeyCode::Esc));

        // Assert
        assert_eq!(
            open,
            ScreenAction::Open(String::from("https://www.themoviedb.org/movie/2"))
        );
        assert_eq!(close, ScreenAction::CloseModal);
    }

    #[test]
    fn test_grid_navigation_bounds() {
        // Arrange
        let mut view = ScreenView::new(None);
        view.columns = 3;

        // Act & Assert
        view.move_left();
        assert_eq!(view.cursor, 0);
        view.move_down(5);
        assert_eq!(view.cursor, 3);
        view.move_right(5);
        assert_eq!(view.cursor, 4);
        view.move_right(5);
        assert_eq!(view.cursor, 4);
        view.move_down(5);
        assert_eq!(view.cursor, 4);
        view.move_up();
        assert_eq!(view.cursor, 1);
        view.move_up();
        assert_eq!(view.cursor, 1);
    }

    #[test]
    fn test_move_down_snaps_to_last_card() {
        // Arrange
        let mut view = ScreenView::new(None);
        view.columns = 3;
        view.cursor = 2;

        // Act
        view.move_down(4);

        // Assert
        assert_eq!(view.cursor, 3);
    }

    #[test]
    fn test_ensure_visible_scrolls() {
        // Arrange
        let mut view = ScreenView::new(None);
        view.columns = 2;
        view.cursor = 9;

        // Act
        view.ensure_visible(2);
        let scrolled_down = view.scroll_row;
        view.cursor = 0;
        view.ensure_visible(2);

        // Assert
        assert_eq!(scrolled_down, 3);
        assert_eq!(view.scroll_row, 0);
    }

    #[test]
    fn test_escape_without_results_quits() {
        // Arrange
        let state = SearchState::new();
        let mut view = ScreenView::new(None);

        // Act & Assert
        assert_eq!(view.handle_key(&state, key(KeyCode::Esc)), ScreenAction::Quit);
    }

    #[test]
    fn test_slash_returns_to_input() {
        // Arrange
        let state = loaded_state(2);
        let mut view = ScreenView::new(None);
        view.on_search_finished(&state);

        // Act
        view.handle_key(&state, key(KeyCode::Char('/')));
        view.handle_key(&state, key(KeyCode::Char('x')));

        // Assert
        assert_eq!(view.focus, Focus::Input);
        assert_eq!(view.input, "x");
    }
}
