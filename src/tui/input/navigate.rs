use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) => app.should_quit = true,
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => app.should_quit = true,

        // Cursor
        (_, KeyCode::Char('j') | KeyCode::Down) => app.move_cursor(1),
        (_, KeyCode::Char('k') | KeyCode::Up) => app.move_cursor(-1),
        (_, KeyCode::PageDown) => app.move_cursor(10),
        (_, KeyCode::PageUp) => app.move_cursor(-10),
        (_, KeyCode::Char('g') | KeyCode::Home) => app.cursor = 0,
        (_, KeyCode::Char('G') | KeyCode::End) => {
            app.cursor = app.rows.len().saturating_sub(1);
        }

        // Item actions
        (_, KeyCode::Char(' ') | KeyCode::Char('x')) => app.toggle_selected(),
        (_, KeyCode::Char('d') | KeyCode::Delete) => app.delete_selected(),

        // Window
        (_, KeyCode::Char('[')) => app.shift_window(-1),
        (_, KeyCode::Char(']')) => app.shift_window(1),
        (_, KeyCode::Char('{')) => app.shift_window(-7),
        (_, KeyCode::Char('}')) => app.shift_window(7),
        (_, KeyCode::Char('t')) => app.reset_window(),

        // Search
        (_, KeyCode::Char('/')) => app.start_search(),
        (_, KeyCode::Esc) => {
            if !app.query.is_empty() {
                app.clear_query();
            }
        }

        (_, KeyCode::Char('r')) => app.reload(true),
        (_, KeyCode::Char('?')) => app.show_help = true,
        _ => {}
    }
}
