use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::display_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint) = match app.mode {
        Mode::Navigate => {
            let spans = if let Some(ref message) = app.status_message {
                vec![Span::styled(
                    format!(" {}", message),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                )]
            } else if !app.query.is_empty() {
                vec![Span::styled(
                    format!(" /{}", app.query),
                    Style::default().fg(app.theme.dim).bg(bg),
                )]
            } else {
                Vec::new()
            };
            let hint = if app.query.is_empty() {
                "? help "
            } else {
                "Esc clear  ? help "
            };
            (spans, hint)
        }
        Mode::Search => {
            // Search prompt: /pat▌tern
            let (before, after) = app.search_input.split_at(app.search_cursor);
            let input_style = Style::default().fg(app.theme.text_bright).bg(bg);
            let spans = vec![
                Span::styled(format!(" /{}", before), input_style),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
                Span::styled(after.to_string(), input_style),
            ];
            (spans, "Enter keep  Esc clear ")
        }
    };

    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
