//! Occurrence expansion for recurring items.
//!
//! Expansion is split in two pure steps: [`generate_candidates`] walks the
//! recurrence forward from the item's own dates, and [`select_occurrence`]
//! reduces the candidates to the single occurrence worth showing.

use chrono::{Days, Months, NaiveDate};

use crate::model::item::{Item, Recurrence};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// One concrete, unpersisted instance of an item at a specific date pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// Copy of the base item with `start_date`/`due_date` advanced
    pub item: Item,
    pub due: NaiveDate,
}

impl Recurrence {
    /// The date one recurrence step after `date`.
    ///
    /// Month-based steps clamp the day to the end of the target month.
    /// Returns `None` for non-recurring items and on calendar overflow.
    pub fn step(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Recurrence::None => None,
            Recurrence::Daily => date.checked_add_days(Days::new(1)),
            Recurrence::Weekly => date.checked_add_days(Days::new(7)),
            Recurrence::Fortnightly => date.checked_add_days(Days::new(14)),
            Recurrence::Monthly => date.checked_add_months(Months::new(1)),
            Recurrence::Yearly => date.checked_add_months(Months::new(12)),
        }
    }
}

/// Generate every occurrence from the item's own dates up to and including `to`.
///
/// Each step is applied to the previous candidate, so a Jan 31 monthly item
/// goes Feb 28, Mar 28, ... Only the first candidate (the item's own dates)
/// keeps the stored completion flag. Older releases cleared it on every
/// candidate, so a completed base date could still surface as overdue.
pub fn generate_candidates(
    item: &Item,
    start: NaiveDate,
    due: NaiveDate,
    to: NaiveDate,
) -> Vec<Occurrence> {
    let mut candidates = Vec::new();
    if !item.recurrence.is_recurring() {
        return candidates;
    }

    let mut current_start = start;
    let mut current_due = due;
    while current_due <= to {
        let mut occurrence = item.clone();
        occurrence.start_date = format_date(current_start);
        occurrence.due_date = format_date(current_due);
        occurrence.completed = candidates.is_empty() && item.completed;
        candidates.push(Occurrence {
            item: occurrence,
            due: current_due,
        });

        match (
            item.recurrence.step(current_start),
            item.recurrence.step(current_due),
        ) {
            (Some(s), Some(d)) => {
                current_start = s;
                current_due = d;
            }
            _ => break,
        }
    }
    candidates
}

/// Pick the one occurrence to surface.
///
/// The latest incomplete occurrence due on or before `today` wins; failing
/// that, the earliest one due after `today`. Returns `None` when everything
/// up to today is done and nothing is upcoming.
pub fn select_occurrence(candidates: Vec<Occurrence>, today: NaiveDate) -> Option<Occurrence> {
    let mut latest_pending: Option<Occurrence> = None;
    let mut earliest_upcoming: Option<Occurrence> = None;

    for candidate in candidates {
        if candidate.due <= today {
            if !candidate.item.completed
                && latest_pending.as_ref().is_none_or(|p| candidate.due >= p.due)
            {
                latest_pending = Some(candidate);
            }
        } else if earliest_upcoming
            .as_ref()
            .is_none_or(|u| candidate.due < u.due)
        {
            earliest_upcoming = Some(candidate);
        }
    }

    latest_pending.or(earliest_upcoming)
}

/// Expand one item against the query window `[from, to]`.
///
/// Items whose dates don't parse are returned unchanged so they stay
/// visible. Non-recurring items are included when their due date falls in
/// the window; recurring items yield at most one selected occurrence.
pub fn expand(item: &Item, from: NaiveDate, to: NaiveDate, today: NaiveDate) -> Vec<Item> {
    let (Some(due), Some(start)) = (parse_date(&item.due_date), parse_date(&item.start_date))
    else {
        return vec![item.clone()];
    };

    if !item.recurrence.is_recurring() {
        if from <= due && due <= to {
            return vec![item.clone()];
        }
        return Vec::new();
    }

    let candidates = generate_candidates(item, start, due, to);
    select_occurrence(candidates, today)
        .map(|o| vec![o.item])
        .unwrap_or_default()
}
