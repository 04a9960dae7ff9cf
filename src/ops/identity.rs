//! Mapping a displayed occurrence back to the stored item it came from.

use serde::Serialize;

use crate::model::item::Item;

/// The visible fields used to re-identify an item that has no id.
///
/// Two items with identical keys are indistinguishable; lookups take the
/// first one in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemKey {
    pub name: String,
    pub start_date: String,
    pub start_time: String,
    pub due_date: String,
    pub end_time: String,
}

impl ItemKey {
    pub fn of(item: &Item) -> Self {
        ItemKey {
            name: item.name.clone(),
            start_date: item.start_date.clone(),
            start_time: item.start_time.clone(),
            due_date: item.due_date.clone(),
            end_time: item.end_time.clone(),
        }
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.name == item.name
            && self.start_date == item.start_date
            && self.start_time == item.start_time
            && self.due_date == item.due_date
            && self.end_time == item.end_time
    }
}

/// What a mutation is aimed at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Stable id assigned at creation
    Id(String),
    /// Visible key, for items without an id
    Key(ItemKey),
}

impl Target {
    /// Target an item (or an occurrence of it): by id when it has one
    pub fn of(item: &Item) -> Self {
        match &item.id {
            Some(id) => Target::Id(id.clone()),
            None => Target::Key(ItemKey::of(item)),
        }
    }
}

/// Index of the first item matching `target`
pub fn resolve(items: &[Item], target: &Target) -> Option<usize> {
    items.iter().position(|item| match target {
        Target::Id(id) => item.id.as_deref() == Some(id.as_str()),
        Target::Key(key) => key.matches(item),
    })
}

/// Set the completion flag on the resolved item. Returns false if nothing matched.
pub fn set_completed(items: &mut [Item], target: &Target, completed: bool) -> bool {
    match resolve(items, target) {
        Some(idx) => {
            items[idx].completed = completed;
            true
        }
        None => false,
    }
}

/// Remove the resolved item and return it
pub fn delete(items: &mut Vec<Item>, target: &Target) -> Option<Item> {
    resolve(items, target).map(|idx| items.remove(idx))
}
