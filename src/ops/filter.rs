use crate::model::item::Item;

/// Whether an item matches a search query: case-insensitive substring of the
/// name or of any tag. An empty query matches everything.
pub fn matches_query(item: &Item, query: &str) -> bool {
    let query = query.to_lowercase();
    item.name.to_lowercase().contains(&query)
        || item.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
}

/// Items matching `query`, in their original order
pub fn filter_items<'a>(items: &'a [Item], query: &str) -> Vec<&'a Item> {
    items
        .iter()
        .filter(|item| matches_query(item, query))
        .collect()
}
