use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

const NAVIGATION: &[(&str, &str)] = &[
    (" \u{2191}\u{2193}/jk", "Move cursor up/down"),
    (" g/G", "Jump to top/bottom"),
    (" PgUp/PgDn", "Move by 10 rows"),
];

const ITEMS: &[(&str, &str)] = &[
    (" Space/x", "Toggle completed"),
    (" d/Del", "Delete (kept in recovery log)"),
    (" r", "Reload from disk"),
];

const WINDOW: &[(&str, &str)] = &[
    (" [ ]", "Window start -/+ 1 day"),
    (" { }", "Window start -/+ 1 week"),
    (" t", "Back to today"),
];

const SEARCH: &[(&str, &str)] = &[
    (" /", "Filter by name or tag"),
    (" Enter", "Keep filter"),
    (" Esc", "Clear filter"),
];

const GLOBAL: &[(&str, &str)] = &[(" ?", "Toggle this help"), (" q", "Quit")];

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (" Navigation", NAVIGATION),
    (" Items", ITEMS),
    (" Window", WINDOW),
    (" Search", SEARCH),
    (" Global", GLOBAL),
];

/// Column the descriptions start at
const KEY_COLUMN: usize = 14;

/// Key binding reference, drawn centered over `area` while `?` is toggled on
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let bold = |color| Style::default().fg(color).bg(bg).add_modifier(Modifier::BOLD);
    let heading = bold(app.theme.text_bright);
    let key_style = bold(app.theme.highlight);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);

    let mut lines = vec![Line::styled(" Key Bindings", heading)];
    for (title, bindings) in SECTIONS {
        lines.push(Line::default());
        lines.push(Line::styled(*title, heading));
        lines.extend(bindings.iter().map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("{:<KEY_COLUMN$}", key), key_style),
                Span::styled(*desc, desc_style),
            ])
        }));
    }

    let content_width = lines.iter().map(Line::width).max().unwrap_or(0);
    let popup = centered(area, content_width as u16 + 3, lines.len() as u16 + 2);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// A `width` x `height` box in the middle of `area`, shrunk to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    popup
}
