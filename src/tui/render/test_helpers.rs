use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::store::{Store, load_workspace};
use crate::model::Item;
use crate::ops::repository::Repository;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Fixed "today" for every TUI test
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

/// A one-day item from 09:00 to 10:00 on `date`
pub fn item(name: &str, date: &str) -> Item {
    let mut item = Item::new(name);
    item.start_date = date.to_string();
    item.due_date = date.to_string();
    item.start_time = "09:00".into();
    item.end_time = "10:00".into();
    item
}

/// App over a temp workspace holding `items`, with ids T-001, T-002, ... assigned.
pub fn app_with_items(mut items: Vec<Item>) -> (TempDir, App) {
    for (i, item) in items.iter_mut().enumerate() {
        item.id.get_or_insert_with(|| format!("T-{:03}", i + 1));
    }
    app_with_raw_items(items)
}

/// App over a temp workspace holding `items` exactly as given.
pub fn app_with_raw_items(items: Vec<Item>) -> (TempDir, App) {
    let dir = TempDir::new().unwrap();
    let things_dir = dir.path().join("things");
    fs::create_dir_all(&things_dir).unwrap();
    fs::write(things_dir.join("config.toml"), "[workspace]\nname = \"Test\"\n").unwrap();
    Store::new(&things_dir).save(&items).unwrap();
    let app = app_in_dir(dir.path());
    (dir, app)
}

/// App over an existing workspace rooted at `root`.
pub fn app_in_dir(root: &Path) -> App {
    let workspace = load_workspace(root).unwrap();
    let repo =
        Repository::open(Store::new(&workspace.things_dir), &workspace.config.ids.prefix).unwrap();
    App::new(workspace, repo, test_today())
}
