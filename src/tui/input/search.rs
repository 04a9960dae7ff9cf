use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary, word_boundary_left};

pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => app.finish_search(false),
        (_, KeyCode::Enter) => app.finish_search(true),

        // Cursor movement
        (_, KeyCode::Left) => {
            if let Some(pos) = prev_grapheme_boundary(&app.search_input, app.search_cursor) {
                app.search_cursor = pos;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(pos) = next_grapheme_boundary(&app.search_input, app.search_cursor) {
                app.search_cursor = pos;
            }
        }
        (_, KeyCode::Home) | (KeyModifiers::CONTROL, KeyCode::Char('a')) => app.search_cursor = 0,
        (_, KeyCode::End) | (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
            app.search_cursor = app.search_input.len();
        }

        // Deletion
        (_, KeyCode::Backspace) => {
            if let Some(pos) = prev_grapheme_boundary(&app.search_input, app.search_cursor) {
                app.search_input.replace_range(pos..app.search_cursor, "");
                app.search_cursor = pos;
                app.refresh();
            }
        }
        (_, KeyCode::Delete) => {
            if let Some(end) = next_grapheme_boundary(&app.search_input, app.search_cursor) {
                app.search_input.replace_range(app.search_cursor..end, "");
                app.refresh();
            }
        }
        (KeyModifiers::CONTROL, KeyCode::Char('w')) => {
            let start = word_boundary_left(&app.search_input, app.search_cursor);
            app.search_input.replace_range(start..app.search_cursor, "");
            app.search_cursor = start;
            app.refresh();
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            app.search_input.clear();
            app.search_cursor = 0;
            app.refresh();
        }

        // Type character
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            app.search_input.insert(app.search_cursor, c);
            app.search_cursor += c.len_utf8();
            app.refresh();
        }
        _ => {}
    }
}
