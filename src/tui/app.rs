use std::io;
use std::path::Path;
use std::time::Duration;

use chrono::{NaiveDate, TimeDelta};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::{Regex, RegexBuilder};

use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::store::{Store, discover_workspace, load_workspace};
use crate::io::watcher::ItemsWatcher;
use crate::model::Workspace;
use crate::ops::agenda::{AgendaRow, Window, build_agenda};
use crate::ops::item_ops;
use crate::ops::reminders::due_items;
use crate::ops::repository::Repository;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Search,
}

/// Main application state
pub struct App {
    pub workspace: Workspace,
    pub repo: Repository,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Date "today" is evaluated against
    pub today: NaiveDate,
    /// Window start relative to `today`, in days
    pub window_offset: i64,
    /// Filter in effect outside search mode
    pub query: String,
    /// Text being typed in search mode (applied live)
    pub search_input: String,
    /// Byte offset of the cursor in `search_input`
    pub search_cursor: usize,
    pub rows: Vec<AgendaRow>,
    pub cursor: usize,
    /// First visible row
    pub scroll_offset: usize,
    pub show_help: bool,
    /// One-shot message for the status row, cleared on the next key
    pub status_message: Option<String>,
}

impl App {
    pub fn new(workspace: Workspace, repo: Repository, today: NaiveDate) -> Self {
        let theme = Theme::from_config(&workspace.config.ui);
        let mut app = App {
            workspace,
            repo,
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            today,
            window_offset: 0,
            query: String::new(),
            search_input: String::new(),
            search_cursor: 0,
            rows: Vec::new(),
            cursor: 0,
            scroll_offset: 0,
            show_help: false,
            status_message: None,
        };
        app.refresh();
        app
    }

    /// The date range currently displayed
    pub fn window(&self) -> Window {
        let from = self
            .today
            .checked_add_signed(TimeDelta::days(self.window_offset))
            .unwrap_or(self.today);
        Window::starting(from, self.workspace.config.view.window_days)
    }

    /// Query applied to the agenda: the live input while searching
    pub fn effective_query(&self) -> &str {
        match self.mode {
            Mode::Search => &self.search_input,
            Mode::Navigate => &self.query,
        }
    }

    /// Case-insensitive regex matching the literal query, for highlighting
    pub fn search_re(&self) -> Option<Regex> {
        let query = self.effective_query();
        if query.is_empty() {
            return None;
        }
        RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
            .ok()
    }

    /// Rebuild rows from the in-memory items and keep the cursor in range
    pub fn refresh(&mut self) {
        self.rows = build_agenda(
            self.repo.list(),
            self.effective_query(),
            self.window(),
            self.today,
        );
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        if self.rows.is_empty() {
            self.cursor = 0;
        } else if self.cursor >= self.rows.len() {
            self.cursor = self.rows.len() - 1;
        }
    }

    pub fn selected_row(&self) -> Option<&AgendaRow> {
        self.rows.get(self.cursor)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let max = self.rows.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(max);
    }

    pub fn due_count(&self) -> usize {
        due_items(self.repo.list(), self.today).len()
    }

    /// Flip completion of the item behind the selected row.
    ///
    /// The stored record decides the new value: a later occurrence of a
    /// recurring item always shows unchecked, even once the series is done.
    pub fn toggle_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let target = row.target.clone();
        let name = row.name.clone();
        let Some(completed) = self.repo.get(&target).map(|item| !item.completed) else {
            self.status_message = Some("no matching item".to_string());
            return;
        };
        self.status_message = Some(match self.repo.set_completed(&target, completed) {
            Ok(true) if completed => format!("done: {}", name),
            Ok(true) => format!("undone: {}", name),
            Ok(false) => "no matching item".to_string(),
            Err(e) => format!("error: {}", e),
        });
        self.refresh();
    }

    /// Delete the item behind the selected row (it is kept in the recovery log)
    pub fn delete_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let target = row.target.clone();
        self.status_message = Some(match self.repo.remove(&target) {
            Ok(Some(item)) => format!("deleted: {}", item.name),
            Ok(None) => "no matching item".to_string(),
            Err(e) => format!("error: {}", e),
        });
        self.refresh();
    }

    /// Move the window start by `days` (negative = earlier)
    pub fn shift_window(&mut self, days: i64) {
        self.window_offset = self.window_offset.saturating_add(days);
        self.refresh();
    }

    pub fn reset_window(&mut self) {
        self.window_offset = 0;
        self.refresh();
    }

    /// Re-read items.json. `announce` puts the outcome on the status row.
    pub fn reload(&mut self, announce: bool) {
        match self.repo.reload() {
            Ok(()) => {
                if announce {
                    self.status_message = Some("reloaded".to_string());
                }
            }
            Err(e) => self.status_message = Some(format!("error: {}", e)),
        }
        self.refresh();
    }

    /// Pick up a new local date after midnight
    pub fn set_today(&mut self, today: NaiveDate) {
        if today != self.today {
            self.today = today;
            self.refresh();
        }
    }

    pub fn start_search(&mut self) {
        self.mode = Mode::Search;
        self.search_input = self.query.clone();
        self.search_cursor = self.search_input.len();
        self.refresh();
    }

    /// Leave search mode; `keep` applies the typed query, otherwise the filter is cleared
    pub fn finish_search(&mut self, keep: bool) {
        self.query = if keep {
            std::mem::take(&mut self.search_input)
        } else {
            self.search_input.clear();
            String::new()
        };
        self.search_cursor = 0;
        self.mode = Mode::Navigate;
        self.refresh();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.refresh();
    }
}

/// Restore UI state from .state.json
pub fn restore_ui_state(app: &mut App) {
    let Some(state) = read_ui_state(&app.workspace.things_dir) else {
        return;
    };
    app.query = state.query;
    app.window_offset = state.window_offset_days;
    app.cursor = state.cursor;
    app.refresh();
}

/// Save UI state to .state.json
pub fn save_ui_state(app: &App) {
    let state = UiState {
        query: app.query.clone(),
        window_offset_days: app.window_offset,
        cursor: app.cursor,
    };
    let _ = write_ui_state(&app.workspace.things_dir, &state);
}

/// Run the TUI application against the workspace found from `start`
pub fn run(start: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let root = discover_workspace(start)?;
    let workspace = load_workspace(&root)?;
    let repo = Repository::open(Store::new(&workspace.things_dir), &workspace.config.ids.prefix)?;

    let mut app = App::new(workspace, repo, item_ops::today());
    restore_ui_state(&mut app);

    // Without a watcher the TUI still works; `r` reloads by hand
    let watcher = match ItemsWatcher::start(&app.workspace.things_dir) {
        Ok(w) => Some(w),
        Err(e) => {
            app.status_message = Some(format!("file watching unavailable: {}", e));
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&ItemsWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            // Debounced state save: every ~5 key presses
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app);
                save_counter = 0;
            }
        }

        if let Some(w) = watcher
            && w.poll()
        {
            app.reload(false);
        }
        app.set_today(item_ops::today());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
