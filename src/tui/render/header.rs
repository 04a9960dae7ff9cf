use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::recurrence::format_date;
use crate::tui::app::App;
use crate::util::unicode::display_width;

/// Render the title line (workspace, window, due count) and a separator below it
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let bg = app.theme.background;
    let width = area.width as usize;
    let window = app.window();

    let mut spans = vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled("\u{25B6}", Style::default().fg(app.theme.purple).bg(bg)),
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(
            app.workspace.config.workspace.name.clone(),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "  {} \u{2192} {}",
                format_date(window.from),
                format_date(window.to)
            ),
            Style::default().fg(app.theme.text).bg(bg),
        ),
    ];
    if window.from != app.today {
        spans.push(Span::styled(
            format!(" ({:+}d)", app.window_offset),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    let due = app.due_count();
    let (due_text, due_color) = if due > 0 {
        (format!("{} due ", due), app.theme.red)
    } else {
        ("nothing due ".to_string(), app.theme.dim)
    };
    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let due_width = display_width(&due_text);
    if content_width + due_width < width {
        spans.push(Span::styled(
            " ".repeat(width - content_width - due_width),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(due_text, Style::default().fg(due_color).bg(bg)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        chunks[0],
    );

    let separator = Span::styled(
        "\u{2500}".repeat(width),
        Style::default().fg(app.theme.dim).bg(bg),
    );
    frame.render_widget(Paragraph::new(Line::from(separator)), chunks[1]);
}
