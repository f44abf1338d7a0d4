//! The set of known addons, in registration order.

use std::sync::{Arc, RwLock};
use tracing::{debug, info};

use crate::cache::ResponseCache;

use super::{AddonDescriptor, AddonError, ResourceKind};

/// Single source of truth for which addons exist and whether they take part
/// in aggregation.
///
/// Iteration order is registration order; it is the merge priority used by
/// the aggregator. Re-registering an existing id replaces the descriptor in
/// place and keeps its position.
#[derive(Debug)]
pub struct AddonRegistry {
    addons: RwLock<Vec<AddonDescriptor>>,
    cache: Arc<ResponseCache>,
}

impl AddonRegistry {
    /// Create an empty registry that invalidates `cache` on removal/disable.
    pub fn new(cache: Arc<ResponseCache>) -> Self {
        Self {
            addons: RwLock::new(Vec::new()),
            cache,
        }
    }

    /// Insert or replace a descriptor by id.
    ///
    /// Returns `true` when an existing entry was replaced. Replacing drops
    /// the addon's cached responses since its capabilities may have changed.
    pub fn register(&self, descriptor: AddonDescriptor) -> Result<bool, AddonError> {
        if descriptor.id.trim().is_empty() {
            return Err(AddonError::InvalidDescriptor(
                "addon id cannot be empty".to_string(),
            ));
        }

        let id = descriptor.id.clone();
        let replaced = {
            let mut addons = self.addons.write().unwrap();
            match addons.iter_mut().find(|a| a.id == descriptor.id) {
                Some(existing) => {
                    *existing = descriptor;
                    true
                }
                None => {
                    addons.push(descriptor);
                    false
                }
            }
        };

        if replaced {
            self.cache.invalidate_addon(&id);
            debug!(addon_id = %id, "Addon descriptor replaced");
        } else {
            info!(addon_id = %id, "Addon registered");
        }
        Ok(replaced)
    }

    /// Remove an addon and every cache entry it contributed to.
    pub fn unregister(&self, id: &str) -> Result<AddonDescriptor, AddonError> {
        let removed = {
            let mut addons = self.addons.write().unwrap();
            let index = addons
                .iter()
                .position(|a| a.id == id)
                .ok_or_else(|| AddonError::NotFound(id.to_string()))?;
            addons.remove(index)
        };

        let invalidated = self.cache.invalidate_addon(id);
        info!(addon_id = id, invalidated = invalidated, "Addon unregistered");
        Ok(removed)
    }

    /// Toggle participation without removing the descriptor.
    ///
    /// Disabling takes effect for the next selection and drops the addon's
    /// cached responses.
    pub fn set_enabled(&self, id: &str, enabled: bool) -> Result<AddonDescriptor, AddonError> {
        let updated = {
            let mut addons = self.addons.write().unwrap();
            let addon = addons
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| AddonError::NotFound(id.to_string()))?;
            addon.enabled = enabled;
            addon.clone()
        };

        if !enabled {
            self.cache.invalidate_addon(id);
        }
        info!(addon_id = id, enabled = enabled, "Addon state changed");
        Ok(updated)
    }

    pub fn get(&self, id: &str) -> Option<AddonDescriptor> {
        self.addons
            .read()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.addons.read().unwrap().iter().any(|a| a.id == id)
    }

    /// All descriptors, in registration order.
    pub fn list(&self) -> Vec<AddonDescriptor> {
        self.addons.read().unwrap().clone()
    }

    /// Enabled descriptors, in registration order.
    pub fn list_enabled(&self) -> Vec<AddonDescriptor> {
        self.filter(|a| a.enabled)
    }

    /// Enabled addons that serve `resource` for `content_type`. For the
    /// catalog resource the addon must also declare the `{content_type,
    /// catalog_id}` catalog.
    pub fn find_supporting(
        &self,
        resource: ResourceKind,
        content_type: &str,
        catalog_id: Option<&str>,
    ) -> Vec<AddonDescriptor> {
        self.filter(|a| {
            a.enabled
                && a.supports(resource, content_type)
                && match (resource, catalog_id) {
                    (ResourceKind::Catalog, Some(id)) => a.has_catalog(content_type, id),
                    _ => true,
                }
        })
    }

    /// Enabled catalog addons with a search-capable catalog of `content_type`.
    pub fn find_searchable(&self, content_type: &str) -> Vec<AddonDescriptor> {
        self.filter(|a| {
            a.enabled
                && a.supports(ResourceKind::Catalog, content_type)
                && a.search_catalog(content_type).is_some()
        })
    }

    pub fn len(&self) -> usize {
        self.addons.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn filter<F>(&self, predicate: F) -> Vec<AddonDescriptor>
    where
        F: Fn(&AddonDescriptor) -> bool,
    {
        self.addons
            .read()
            .unwrap()
            .iter()
            .filter(|a| predicate(a))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheKey, CachedValue};
    use crate::content::{CatalogItem, ExtraParams};
    use crate::testing::fixtures;

    fn registry() -> (AddonRegistry, Arc<ResponseCache>) {
        let cache = Arc::new(ResponseCache::default());
        (AddonRegistry::new(Arc::clone(&cache)), cache)
    }

    #[test]
    fn test_register_and_list_in_order() {
        let (registry, _) = registry();
        registry.register(fixtures::catalog_addon("b", "movie", "top")).unwrap();
        registry.register(fixtures::catalog_addon("a", "movie", "top")).unwrap();

        let ids: Vec<_> = registry.list().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_register_same_id_replaces_in_place() {
        let (registry, _) = registry();
        registry.register(fixtures::catalog_addon("a", "movie", "top")).unwrap();
        registry.register(fixtures::catalog_addon("b", "movie", "top")).unwrap();

        let mut updated = fixtures::catalog_addon("a", "movie", "top");
        updated.name = "Renamed".to_string();
        assert!(registry.register(updated).unwrap());

        let all = registry.list();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "a");
        assert_eq!(all[0].name, "Renamed");
    }

    #[test]
    fn test_register_empty_id_rejected() {
        let (registry, _) = registry();
        let err = registry
            .register(fixtures::catalog_addon("  ", "movie", "top"))
            .unwrap_err();
        assert!(matches!(err, AddonError::InvalidDescriptor(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister_unknown_is_not_found() {
        let (registry, _) = registry();
        assert!(matches!(
            registry.unregister("ghost"),
            Err(AddonError::NotFound(id)) if id == "ghost"
        ));
    }

    #[test]
    fn test_unregister_invalidates_cache() {
        let (registry, cache) = registry();
        registry.register(fixtures::catalog_addon("x", "movie", "top")).unwrap();

        let key = CacheKey::catalog("movie", "top", &ExtraParams::new());
        cache.set(
            key.clone(),
            CachedValue::Catalog(vec![CatalogItem::new("tt1", "movie", "A")]),
            ["x"],
        );

        registry.unregister("x").unwrap();
        assert!(cache.get(&key).is_none());
        assert!(!registry.contains("x"));
    }

    #[test]
    fn test_disable_excludes_from_selection_and_invalidates() {
        let (registry, cache) = registry();
        registry.register(fixtures::catalog_addon("x", "movie", "top")).unwrap();
        let key = CacheKey::catalog("movie", "top", &ExtraParams::new());
        cache.set(key.clone(), CachedValue::Catalog(vec![]), ["x"]);

        registry.set_enabled("x", false).unwrap();
        assert!(registry
            .find_supporting(ResourceKind::Catalog, "movie", Some("top"))
            .is_empty());
        assert!(cache.get(&key).is_none());
        assert_eq!(registry.list().len(), 1);
        assert!(registry.list_enabled().is_empty());

        registry.set_enabled("x", true).unwrap();
        assert_eq!(
            registry
                .find_supporting(ResourceKind::Catalog, "movie", Some("top"))
                .len(),
            1
        );
    }

    #[test]
    fn test_find_supporting_requires_matching_catalog() {
        let (registry, _) = registry();
        registry.register(fixtures::catalog_addon("a", "movie", "top")).unwrap();
        registry.register(fixtures::catalog_addon("b", "movie", "popular")).unwrap();
        registry.register(fixtures::catalog_addon("c", "series", "top")).unwrap();

        let found = registry.find_supporting(ResourceKind::Catalog, "movie", Some("top"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "a");
    }

    #[test]
    fn test_find_supporting_resource_and_type() {
        let (registry, _) = registry();
        registry.register(fixtures::stream_addon("s1", &["movie"])).unwrap();
        registry.register(fixtures::stream_addon("s2", &["series"])).unwrap();
        registry.register(fixtures::catalog_addon("c", "movie", "top")).unwrap();

        let found = registry.find_supporting(ResourceKind::Stream, "movie", None);
        let ids: Vec<_> = found.into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["s1"]);
    }

    #[test]
    fn test_find_searchable() {
        let (registry, _) = registry();
        registry.register(fixtures::catalog_addon("plain", "movie", "top")).unwrap();
        registry
            .register(fixtures::searchable_addon("search", "movie"))
            .unwrap();

        let found = registry.find_searchable("movie");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "search");
        assert!(registry.find_searchable("series").is_empty());
    }
}
