use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use regex::Regex;

use crate::ops::agenda::AgendaRow;
use crate::ops::recurrence::parse_date;
use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

use super::push_highlighted_spans;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Done,
    Name,
    Tags,
    StartDate,
    StartTime,
    Due,
    EndTime,
    Priority,
    Repeat,
}

impl Column {
    fn label(self) -> &'static str {
        match self {
            Column::Done => "",
            Column::Name => "Name",
            Column::Tags => "Tags",
            Column::StartDate => "Start",
            Column::StartTime => "Time",
            Column::Due => "Due",
            Column::EndTime => "End",
            Column::Priority => "Pri",
            Column::Repeat => "Repeat",
        }
    }

    /// Fixed width; `None` for the name column, which takes the rest
    fn width(self) -> Option<usize> {
        match self {
            Column::Done => Some(3),
            Column::Name => None,
            Column::Tags => Some(12),
            Column::StartDate | Column::Due => Some(10),
            Column::StartTime | Column::EndTime => Some(5),
            Column::Priority => Some(6),
            Column::Repeat => Some(11),
        }
    }
}

const ALL_COLUMNS: [Column; 9] = [
    Column::Done,
    Column::Name,
    Column::Tags,
    Column::StartDate,
    Column::StartTime,
    Column::Due,
    Column::EndTime,
    Column::Priority,
    Column::Repeat,
];

/// Columns hidden first when the terminal is narrow
const DROP_ORDER: [Column; 3] = [Column::Tags, Column::EndTime, Column::StartDate];

const MIN_NAME_WIDTH: usize = 16;
const LEFT_MARGIN: usize = 1;
const GAP: usize = 1;

/// Visible columns and their widths for a terminal `width` cells wide
fn layout_columns(width: usize) -> Vec<(Column, usize)> {
    let mut columns: Vec<Column> = ALL_COLUMNS.to_vec();
    let fixed = |cols: &[Column]| -> usize {
        LEFT_MARGIN
            + cols.iter().filter_map(|c| c.width()).sum::<usize>()
            + GAP * (cols.len() - 1)
    };

    for drop in DROP_ORDER {
        if fixed(&columns) + MIN_NAME_WIDTH <= width {
            break;
        }
        columns.retain(|c| *c != drop);
    }

    let name_width = width.saturating_sub(fixed(&columns)).max(MIN_NAME_WIDTH);
    columns
        .into_iter()
        .map(|c| (c, c.width().unwrap_or(name_width)))
        .collect()
}

/// Push `text` clipped to `budget` cells, highlighting matches. Returns cells used.
fn push_clipped<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    budget: usize,
    style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) -> usize {
    if budget == 0 || text.is_empty() {
        return 0;
    }
    let clipped = truncate_to_width(text, budget);
    push_highlighted_spans(spans, &clipped, style, highlight_style, search_re);
    display_width(&clipped)
}

/// Render the agenda table with a column header row
pub fn render_agenda_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;

    if app.rows.is_empty() {
        let message = if app.effective_query().is_empty() {
            " No items in this window".to_string()
        } else {
            format!(" No items match \"{}\"", app.effective_query())
        };
        let empty = Paragraph::new(message).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let columns = layout_columns(area.width as usize);
    let visible_height = (area.height as usize).saturating_sub(1);

    // Keep the cursor on screen
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if visible_height > 0 && app.cursor >= app.scroll_offset + visible_height {
        app.scroll_offset = app.cursor + 1 - visible_height;
    }

    let mut lines: Vec<Line> = Vec::with_capacity(visible_height + 1);
    lines.push(header_line(app, &columns));

    let search_re = app.search_re();
    let end = (app.scroll_offset + visible_height).min(app.rows.len());
    for (i, row) in app.rows[app.scroll_offset..end].iter().enumerate() {
        let is_cursor = app.scroll_offset + i == app.cursor;
        lines.push(row_line(app, row, &columns, is_cursor, search_re.as_ref()));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn header_line<'a>(app: &App, columns: &[(Column, usize)]) -> Line<'a> {
    let style = Style::default()
        .fg(app.theme.dim)
        .bg(app.theme.background)
        .add_modifier(Modifier::BOLD);
    let mut text = " ".repeat(LEFT_MARGIN);
    for (i, (column, width)) in columns.iter().enumerate() {
        if i > 0 {
            text.push_str(&" ".repeat(GAP));
        }
        let label = truncate_to_width(column.label(), *width);
        text.push_str(&label);
        text.push_str(&" ".repeat(width - display_width(&label)));
    }
    Line::from(Span::styled(text, style))
}

fn row_line<'a>(
    app: &App,
    row: &AgendaRow,
    columns: &[(Column, usize)],
    is_cursor: bool,
    search_re: Option<&Regex>,
) -> Line<'a> {
    let theme = &app.theme;
    let bg = if is_cursor {
        theme.selection_bg
    } else {
        theme.background
    };
    let base = Style::default().bg(bg);
    let text_style = if row.completed {
        base.fg(theme.dim)
    } else {
        base.fg(theme.text)
    };
    let hl_style = Style::default()
        .fg(theme.search_match_fg)
        .bg(theme.search_match_bg);

    let mut spans: Vec<Span> = vec![Span::styled(" ".repeat(LEFT_MARGIN), base)];
    for (i, (column, width)) in columns.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" ".repeat(GAP), base));
        }
        let used = match column {
            Column::Done => {
                let (symbol, color) = if row.completed {
                    ("[x]", theme.green)
                } else {
                    ("[ ]", theme.dim)
                };
                push_clipped(&mut spans, symbol, *width, base.fg(color), hl_style, None)
            }
            Column::Name => {
                let mut used = 0;
                if let Some(id) = &row.id {
                    used += push_clipped(&mut spans, id, *width, base.fg(theme.dim), hl_style, None);
                    if used < *width {
                        spans.push(Span::styled(" ", base));
                        used += 1;
                    }
                }
                let name_style = if is_cursor && !row.completed {
                    base.fg(theme.text_bright).add_modifier(Modifier::BOLD)
                } else if row.completed {
                    text_style
                } else {
                    base.fg(theme.text_bright)
                };
                used + push_clipped(&mut spans, &row.name, width - used, name_style, hl_style, search_re)
            }
            Column::Tags => {
                let mut used = 0;
                for (j, tag) in row.tags.split(", ").filter(|t| !t.is_empty()).enumerate() {
                    if j > 0 {
                        used += push_clipped(&mut spans, ",", width - used, text_style, hl_style, None);
                    }
                    let style = if row.completed {
                        text_style
                    } else {
                        base.fg(theme.tag_color(tag))
                    };
                    used += push_clipped(&mut spans, tag, width - used, style, hl_style, search_re);
                }
                used
            }
            Column::StartDate => push_clipped(&mut spans, &row.start_date, *width, text_style, hl_style, None),
            Column::StartTime => push_clipped(&mut spans, &row.start_time, *width, text_style, hl_style, None),
            Column::Due => {
                let overdue = !row.completed
                    && parse_date(&row.due_date).is_some_and(|due| due < app.today);
                let style = if overdue { base.fg(theme.red) } else { text_style };
                push_clipped(&mut spans, &row.due_date, *width, style, hl_style, None)
            }
            Column::EndTime => push_clipped(&mut spans, &row.end_time, *width, text_style, hl_style, None),
            Column::Priority => {
                let style = if row.completed {
                    text_style
                } else {
                    base.fg(theme.priority_color(row.priority))
                };
                push_clipped(&mut spans, row.priority.as_str(), *width, style, hl_style, None)
            }
            Column::Repeat => {
                let text = if row.recurrence.is_recurring() {
                    row.recurrence.as_str()
                } else {
                    ""
                };
                push_clipped(&mut spans, text, *width, text_style, hl_style, None)
            }
        };
        if used < *width {
            spans.push(Span::styled(" ".repeat(width - used), base));
        }
    }
    Line::from(spans)
}
