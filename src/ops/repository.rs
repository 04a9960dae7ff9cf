use crate::io::recovery;
use crate::io::store::{Store, StoreError};
use crate::model::item::Item;
use crate::ops::identity::{self, Target};

/// The in-memory item list plus the store it persists to.
///
/// Every successful mutation saves the whole list; a mutation that matches
/// nothing leaves the file untouched.
#[derive(Debug)]
pub struct Repository {
    store: Store,
    items: Vec<Item>,
    id_prefix: String,
}

impl Repository {
    /// Load items from `store`
    pub fn open(store: Store, id_prefix: &str) -> Result<Self, StoreError> {
        let items = store.load()?;
        Ok(Repository {
            store,
            items,
            id_prefix: id_prefix.to_string(),
        })
    }

    pub fn list(&self) -> &[Item] {
        &self.items
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn get(&self, target: &Target) -> Option<&Item> {
        identity::resolve(&self.items, target).map(|idx| &self.items[idx])
    }

    /// Re-read the item file, replacing the in-memory list
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.items = self.store.load()?;
        Ok(())
    }

    /// Append an item, assigning it a fresh id. Returns the id.
    pub fn add(&mut self, mut item: Item) -> Result<String, StoreError> {
        let id = next_id(&self.items, &self.id_prefix);
        item.id = Some(id.clone());
        self.items.push(item);
        self.store.save(&self.items)?;
        Ok(id)
    }

    /// Apply `edit` to the targeted item. The item's id cannot be changed.
    pub fn update(
        &mut self,
        target: &Target,
        edit: impl FnOnce(&mut Item),
    ) -> Result<bool, StoreError> {
        let Some(idx) = identity::resolve(&self.items, target) else {
            return Ok(false);
        };
        let id = self.items[idx].id.clone();
        edit(&mut self.items[idx]);
        self.items[idx].id = id;
        self.store.save(&self.items)?;
        Ok(true)
    }

    pub fn set_completed(&mut self, target: &Target, completed: bool) -> Result<bool, StoreError> {
        if !identity::set_completed(&mut self.items, target, completed) {
            return Ok(false);
        }
        self.store.save(&self.items)?;
        Ok(true)
    }

    /// Remove the targeted item, recording it in the recovery log first
    pub fn remove(&mut self, target: &Target) -> Result<Option<Item>, StoreError> {
        let Some(removed) = identity::delete(&mut self.items, target) else {
            return Ok(None);
        };
        let label = removed.id.clone().unwrap_or_else(|| removed.name.clone());
        let json = serde_json::to_string_pretty(&removed)?;
        recovery::log_item_deletion(self.store.things_dir(), &label, &json);
        self.store.save(&self.items)?;
        Ok(Some(removed))
    }
}

/// Next id for `prefix`: one past the highest existing `PREFIX-N`, zero-padded to 3.
pub fn next_id(items: &[Item], prefix: &str) -> String {
    let max = items
        .iter()
        .filter_map(|item| item.id.as_deref())
        .filter_map(|id| id.strip_prefix(prefix)?.strip_prefix('-')?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{}-{:03}", prefix, max + 1)
}
