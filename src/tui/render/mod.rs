pub mod agenda_view;
pub mod header;
pub mod help_overlay;
pub mod status_row;
#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use regex::Regex;

use super::app::App;

/// Draw one frame: header, agenda table, status row, and the help overlay when open
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(app.theme.background)), area);

    let [header_area, agenda_area, status_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(1), Constraint::Length(1)]).areas(area);

    header::render_header(frame, app, header_area);
    agenda_view::render_agenda_view(frame, app, agenda_area);
    status_row::render_status_row(frame, app, status_area);

    // Drawn last so it covers the agenda
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }
}

/// Append `text` as spans, with every match of `search_re` in `highlight_style`
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let mut cursor = 0;
    for m in search_re.into_iter().flat_map(|re| re.find_iter(text)) {
        if m.is_empty() {
            continue;
        }
        if m.start() > cursor {
            spans.push(Span::styled(text[cursor..m.start()].to_string(), base_style));
        }
        spans.push(Span::styled(m.as_str().to_string(), highlight_style));
        cursor = m.end();
    }
    if cursor < text.len() || text.is_empty() {
        spans.push(Span::styled(text[cursor..].to_string(), base_style));
    }
}
