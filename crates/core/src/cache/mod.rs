//! In-memory response cache with a fixed TTL.
//!
//! The aggregator writes every non-empty fan-out result here so identical
//! requests within the TTL window never reach the addons again. Entries are
//! only checked for expiry when they are read; nothing runs in the
//! background and there is no size bound.

mod clock;
mod key;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::{CacheKey, CacheOperation};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::content::{CatalogItem, StreamDescriptor, Subtitle};
use crate::metrics::CACHE_LOOKUPS;

/// Default entry lifetime in seconds (30 minutes).
pub const DEFAULT_TTL_SECS: i64 = 30 * 60;

/// A cached aggregator response.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Catalog(Vec<CatalogItem>),
    Meta(CatalogItem),
    Streams(Vec<StreamDescriptor>),
    Subtitles(Vec<Subtitle>),
}

/// A stored value with the time it was written and the addons it came from.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: CachedValue,
    pub stored_at: DateTime<Utc>,
    pub sources: BTreeSet<String>,
}

/// Cache counters.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub ttl_secs: i64,
}

/// Process-wide response cache.
pub struct ResponseCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    /// Create a cache backed by the wall clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a live entry. An expired entry is removed and reported absent.
    pub fn get(&self, key: &CacheKey) -> Option<CachedValue> {
        let now = self.clock.now();
        let operation = key.operation.as_str();

        {
            let entries = self.entries.read().unwrap();
            match entries.get(key) {
                Some(entry) if now - entry.stored_at < self.ttl => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    CACHE_LOOKUPS.with_label_values(&[operation, "hit"]).inc();
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    CACHE_LOOKUPS.with_label_values(&[operation, "miss"]).inc();
                    return None;
                }
            }
        }

        // Expired: re-check under the write lock, a concurrent set may have
        // refreshed it in between.
        let mut entries = self.entries.write().unwrap();
        if let Some(entry) = entries.get(key) {
            if now - entry.stored_at < self.ttl {
                self.hits.fetch_add(1, Ordering::Relaxed);
                CACHE_LOOKUPS.with_label_values(&[operation, "hit"]).inc();
                return Some(entry.value.clone());
            }
            entries.remove(key);
            debug!(key = %key, "Cache entry expired");
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        CACHE_LOOKUPS
            .with_label_values(&[operation, "expired"])
            .inc();
        None
    }

    /// Store a value, overwriting any existing entry.
    pub fn set<I, S>(&self, key: CacheKey, value: CachedValue, sources: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
            sources: sources.into_iter().map(Into::into).collect(),
        };
        debug!(key = %key, sources = ?entry.sources, "Cache write");
        self.entries.write().unwrap().insert(key, entry);
    }

    /// Remove a single entry. Returns whether it existed.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.entries.write().unwrap().remove(key).is_some()
    }

    /// Remove every entry of an operation. Returns the number removed.
    pub fn invalidate_prefix(&self, operation: CacheOperation) -> usize {
        self.invalidate_where(|key, _| key.operation == operation)
    }

    /// Remove every entry that includes data from `addon_id`.
    pub fn invalidate_addon(&self, addon_id: &str) -> usize {
        let removed = self.invalidate_where(|_, entry| entry.sources.contains(addon_id));
        if removed > 0 {
            debug!(addon_id = addon_id, removed = removed, "Invalidated addon cache entries");
        }
        removed
    }

    /// Remove every entry matching `predicate`. Returns the number removed.
    pub fn invalidate_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CacheKey, &CacheEntry) -> bool,
    {
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|key, entry| !predicate(key, entry));
        before - entries.len()
    }

    /// Drop everything.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write().unwrap();
        let count = entries.len();
        entries.clear();
        count
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            ttl_secs: self.ttl.num_seconds(),
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ExtraParams;

    fn ttl() -> Duration {
        Duration::seconds(DEFAULT_TTL_SECS)
    }

    fn cache_with_clock() -> (ResponseCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = ResponseCache::with_clock(ttl(), clock.clone());
        (cache, clock)
    }

    fn catalog(ids: &[&str]) -> CachedValue {
        CachedValue::Catalog(
            ids.iter()
                .map(|id| CatalogItem::new(*id, "movie", format!("Movie {}", id)))
                .collect(),
        )
    }

    #[test]
    fn test_get_missing_returns_none() {
        let (cache, _) = cache_with_clock();
        assert!(cache.get(&CacheKey::meta("movie", "tt1")).is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_set_then_get() {
        let (cache, _) = cache_with_clock();
        let key = CacheKey::catalog("movie", "top", &ExtraParams::new());
        cache.set(key.clone(), catalog(&["tt1"]), ["addon-a"]);

        assert_eq!(cache.get(&key), Some(catalog(&["tt1"])));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_entry_valid_just_before_ttl() {
        let (cache, clock) = cache_with_clock();
        let key = CacheKey::streams("movie", "tt1");
        cache.set(key.clone(), CachedValue::Streams(vec![]), ["a"]);

        clock.advance(ttl() - Duration::seconds(1));
        assert!(cache.get(&key).is_some());
    }

    #[test]
    fn test_entry_expires_at_ttl_and_is_purged() {
        let (cache, clock) = cache_with_clock();
        let key = CacheKey::streams("movie", "tt1");
        cache.set(key.clone(), CachedValue::Streams(vec![]), ["a"]);

        clock.advance(ttl());
        assert!(cache.get(&key).is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_set_overwrites_and_restamps() {
        let (cache, clock) = cache_with_clock();
        let key = CacheKey::meta("movie", "tt1");
        cache.set(key.clone(), catalog(&["old"]), ["a"]);

        clock.advance(Duration::minutes(20));
        cache.set(key.clone(), catalog(&["new"]), ["a"]);

        clock.advance(Duration::minutes(20));
        assert_eq!(cache.get(&key), Some(catalog(&["new"])));
    }

    #[test]
    fn test_invalidate_addon_removes_entries_it_contributed_to() {
        let (cache, _) = cache_with_clock();
        let only_x = CacheKey::catalog("movie", "top", &ExtraParams::new());
        let mixed = CacheKey::catalog("movie", "popular", &ExtraParams::new());
        let only_y = CacheKey::streams("movie", "tt1");

        cache.set(only_x.clone(), catalog(&["tt1"]), ["x"]);
        cache.set(mixed.clone(), catalog(&["tt2"]), ["x", "y"]);
        cache.set(only_y.clone(), CachedValue::Streams(vec![]), ["y"]);

        assert_eq!(cache.invalidate_addon("x"), 2);
        assert!(cache.get(&only_x).is_none());
        assert!(cache.get(&mixed).is_none());
        assert!(cache.get(&only_y).is_some());
    }

    #[test]
    fn test_invalidate_prefix() {
        let (cache, _) = cache_with_clock();
        cache.set(CacheKey::meta("movie", "tt1"), catalog(&["tt1"]), ["a"]);
        cache.set(CacheKey::meta("series", "tt2"), catalog(&["tt2"]), ["a"]);
        cache.set(CacheKey::streams("movie", "tt1"), CachedValue::Streams(vec![]), ["a"]);

        assert_eq!(cache.invalidate_prefix(CacheOperation::Meta), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_single_key_and_clear() {
        let (cache, _) = cache_with_clock();
        let key = CacheKey::meta("movie", "tt1");
        cache.set(key.clone(), catalog(&["tt1"]), ["a"]);
        cache.set(CacheKey::meta("movie", "tt2"), catalog(&["tt2"]), ["a"]);

        assert!(cache.invalidate(&key));
        assert!(!cache.invalidate(&key));
        assert_eq!(cache.clear(), 1);
        assert!(cache.is_empty());
    }
}
