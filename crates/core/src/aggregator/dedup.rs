//! Merge helpers for catalog fan-out.

use std::collections::HashSet;

use crate::content::CatalogItem;

/// Drop items whose id was already seen, keeping the first occurrence.
///
/// Input order is preserved, so callers feeding results in registry order
/// get registry-priority merging.
pub fn dedupe_by_id<I>(items: I) -> Vec<CatalogItem>
where
    I: IntoIterator<Item = CatalogItem>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .collect()
}
