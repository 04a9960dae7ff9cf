use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::model::item::{Item, Priority, Recurrence};
use crate::ops::filter::filter_items;
use crate::ops::identity::Target;
use crate::ops::recurrence::expand;

/// One displayed row of the agenda
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Tags joined with `", "`
    pub tags: String,
    pub start_date: String,
    pub start_time: String,
    pub due_date: String,
    pub end_time: String,
    pub priority: Priority,
    pub recurrence: Recurrence,
    pub completed: bool,
    /// How to reach the stored item behind this row
    #[serde(skip)]
    pub target: Target,
}

impl AgendaRow {
    pub fn from_occurrence(item: &Item) -> Self {
        AgendaRow {
            id: item.id.clone(),
            name: item.name.clone(),
            tags: item.tags_joined(),
            start_date: item.start_date.clone(),
            start_time: item.start_time.clone(),
            due_date: item.due_date.clone(),
            end_time: item.end_time.clone(),
            priority: item.priority,
            recurrence: item.recurrence,
            completed: item.completed,
            target: Target::of(item),
        }
    }
}

/// The `[from, to]` date range rows are evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl Window {
    /// Window of `days` days after `from` (inclusive on both ends)
    pub fn starting(from: NaiveDate, days: u32) -> Self {
        let to = from
            .checked_add_days(Days::new(days as u64))
            .unwrap_or(NaiveDate::MAX);
        Window { from, to }
    }
}

/// Filter, expand and sort items into agenda rows.
///
/// Rows are ordered by start date (as stored text); ties keep list order.
pub fn build_agenda(items: &[Item], query: &str, window: Window, today: NaiveDate) -> Vec<AgendaRow> {
    let mut rows: Vec<AgendaRow> = filter_items(items, query)
        .into_iter()
        .flat_map(|item| expand(item, window.from, window.to, today))
        .map(|occurrence| AgendaRow::from_occurrence(&occurrence))
        .collect();
    rows.sort_by(|a, b| a.start_date.cmp(&b.start_date));
    rows
}
