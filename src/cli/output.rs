use serde::Serialize;

use crate::model::item::Item;
use crate::ops::agenda::{AgendaRow, Window};
use crate::ops::recurrence::format_date;
use crate::util::unicode::{display_width, pad_to_width, truncate_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct AgendaJson<'a> {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub query: &'a str,
    pub rows: &'a [AgendaRow],
}

pub fn agenda_to_json<'a>(rows: &'a [AgendaRow], window: Window, query: &'a str) -> AgendaJson<'a> {
    AgendaJson {
        from: format_date(window.from),
        to: format_date(window.to),
        query,
        rows,
    }
}

#[derive(Serialize)]
pub struct DueJson<'a> {
    pub title: String,
    pub items: Vec<&'a Item>,
}

#[derive(Serialize)]
pub struct MutationJson {
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

const HEADERS: [&str; 9] = [
    "Name",
    "Tags",
    "Start Date",
    "Start Time",
    "Due",
    "End Time",
    "Priority",
    "Recurrence",
    "Done",
];

/// Widest a name or tag column may get before truncation
const MAX_TEXT_COL: usize = 30;

fn row_cells(row: &AgendaRow) -> [String; 9] {
    [
        match &row.id {
            Some(id) => format!("{} {}", id, row.name),
            None => row.name.clone(),
        },
        row.tags.clone(),
        row.start_date.clone(),
        row.start_time.clone(),
        row.due_date.clone(),
        row.end_time.clone(),
        row.priority.to_string(),
        row.recurrence.to_string(),
        if row.completed { "[x]" } else { "[ ]" }.to_string(),
    ]
}

/// Format agenda rows as an aligned table with a header line
pub fn format_agenda_table(rows: &[AgendaRow]) -> Vec<String> {
    let cells: Vec<[String; 9]> = rows.iter().map(row_cells).collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| display_width(h)).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(display_width(cell));
        }
    }
    widths[0] = widths[0].min(MAX_TEXT_COL);
    widths[1] = widths[1].min(MAX_TEXT_COL);

    let format_line = |values: &[String]| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| pad_to_width(&truncate_to_width(v, *w), *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(cells.len() + 1);
    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    lines.push(format_line(&header));
    for row in &cells {
        lines.push(format_line(row));
    }
    lines
}

/// Format a stored item's full detail
pub fn format_item_detail(item: &Item) -> Vec<String> {
    let mut lines = Vec::new();
    let check = if item.completed { 'x' } else { ' ' };
    match &item.id {
        Some(id) => lines.push(format!("[{}] {} {}", check, id, item.name)),
        None => lines.push(format!("[{}] {}", check, item.name)),
    }
    if !item.tags.is_empty() {
        lines.push(format!("tags: {}", item.tags_joined()));
    }
    lines.push(format!("start: {} {}", item.start_date, item.start_time));
    lines.push(format!("due: {} {}", item.due_date, item.end_time));
    lines.push(format!("priority: {}", item.priority));
    lines.push(format!("repeat: {}", item.recurrence));
    if !item.fields.is_empty() {
        lines.push("fields:".to_string());
        for (k, v) in &item.fields {
            lines.push(format!("  {}: {}", k, v));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::{Priority, Recurrence};

    fn row(id: Option<&str>, name: &str, tags: &[&str]) -> AgendaRow {
        let mut item = Item::new(name);
        item.id = id.map(|s| s.to_string());
        item.tags = tags.iter().map(|s| s.to_string()).collect();
        item.start_date = "2024-01-01".into();
        item.due_date = "2024-01-02".into();
        item.start_time = "09:00".into();
        item.end_time = "10:00".into();
        item.priority = Priority::High;
        item.recurrence = Recurrence::Weekly;
        AgendaRow::from_occurrence(&item)
    }

    #[test]
    fn table_aligns_columns() {
        let rows = vec![row(Some("T-001"), "Gym", &["health"]), row(None, "Dentist appointment", &[])];
        let lines = format_agenda_table(&rows);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Name"));
        assert!(lines[1].starts_with("T-001 Gym"));
        assert!(lines[2].starts_with("Dentist appointment"));
        let tags_col = lines[0].find("Tags").unwrap();
        assert_eq!(lines[1].find("health").unwrap(), tags_col);
        assert!(lines[1].ends_with("Weekly      [ ]"));
    }

    #[test]
    fn long_names_are_truncated() {
        let long = "x".repeat(60);
        let lines = format_agenda_table(&[row(None, &long, &[])]);
        assert!(lines[1].contains('\u{2026}'));
        assert!(!lines[1].contains(&long));
    }

    #[test]
    fn empty_table_has_header_only() {
        let lines = format_agenda_table(&[]);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn item_detail_lists_fields() {
        let mut item = Item::new("Gym");
        item.id = Some("T-003".into());
        item.completed = true;
        item.fields.insert("coach".into(), "Sam".into());
        let lines = format_item_detail(&item);
        assert_eq!(lines[0], "[x] T-003 Gym");
        assert!(lines.contains(&"  coach: Sam".to_string()));
        assert!(lines.contains(&"priority: Low".to_string()));
    }
}
