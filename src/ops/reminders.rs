use chrono::NaiveDate;

use crate::model::item::Item;
use crate::ops::recurrence::parse_date;

/// Stored items that are due today or overdue and not completed, in list order.
///
/// Looks at the stored record only (no recurrence expansion). Items whose
/// due date doesn't parse are skipped.
pub fn due_items(items: &[Item], today: NaiveDate) -> Vec<&Item> {
    items
        .iter()
        .filter(|item| !item.completed)
        .filter(|item| parse_date(&item.due_date).is_some_and(|due| due <= today))
        .collect()
}

/// Reminder text: a title and a body listing each due item
pub fn reminder_message(due: &[&Item]) -> (String, String) {
    if due.is_empty() {
        return (
            "Thing Tracker".to_string(),
            "No tasks due or overdue.".to_string(),
        );
    }
    let body = due
        .iter()
        .map(|item| format!("{} (Due: {})", item.name, item.due_date))
        .collect::<Vec<_>>()
        .join("\n");
    ("Thing Tracker - Due Tasks".to_string(), body)
}
