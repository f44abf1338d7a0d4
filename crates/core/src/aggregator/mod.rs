//! Fan-out of content requests across registered addons.
//!
//! Each entry point follows the same path: cache lookup, addon selection,
//! concurrent calls bounded by a per-call timeout, merge in registry order,
//! cache write. Addon failures are logged and dropped; callers only ever see
//! an (possibly empty) result or an invalid-request error.

mod dedup;
mod types;

pub use dedup::dedupe_by_id;
pub use types::*;

use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

use crate::addon::{AddonDescriptor, AddonError, AddonRegistry, AddonTransport, ResourceKind};
use crate::cache::{CacheKey, CachedValue, ResponseCache};
use crate::content::{CatalogItem, ExtraParams};
use crate::metrics::{ADDON_REQUESTS, ADDON_REQUEST_DURATION};

/// Errors returned by aggregator entry points.
#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Queries every capable addon and merges what comes back.
pub struct Aggregator {
    registry: Arc<AddonRegistry>,
    cache: Arc<ResponseCache>,
    transport: Arc<dyn AddonTransport>,
    call_timeout: Duration,
}

impl Aggregator {
    pub fn new(
        registry: Arc<AddonRegistry>,
        cache: Arc<ResponseCache>,
        transport: Arc<dyn AddonTransport>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            cache,
            transport,
            call_timeout,
        }
    }

    pub fn registry(&self) -> &Arc<AddonRegistry> {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Merged catalog from every addon declaring `{type, id}`.
    pub async fn get_catalog(&self, query: &CatalogQuery) -> Result<CatalogResponse, AggregatorError> {
        require("type", &query.content_type)?;
        require("catalog id", &query.id)?;

        let key = CacheKey::catalog(&query.content_type, &query.id, &query.extra);
        if let Some(CachedValue::Catalog(metas)) = self.cache.get(&key) {
            return Ok(CatalogResponse { metas });
        }

        let addons =
            self.registry
                .find_supporting(ResourceKind::Catalog, &query.content_type, Some(&query.id));
        if addons.is_empty() {
            debug!(key = %key, "No addon serves this catalog");
            return Ok(CatalogResponse::default());
        }

        let calls = addons.iter().map(|addon| {
            self.guarded(
                ResourceKind::Catalog,
                addon,
                self.transport
                    .fetch_catalog(addon, &query.content_type, &query.id, &query.extra),
            )
        });
        let outcomes = join_all(calls).await;

        let (metas, sources) = merge_catalogs(&addons, outcomes);
        if !metas.is_empty() {
            self.store(key, CachedValue::Catalog(metas.clone()), sources);
        }
        Ok(CatalogResponse { metas })
    }

    /// First meta record found, probing addons one at a time in registry
    /// order.
    pub async fn get_meta(&self, query: &ItemQuery) -> Result<MetaResponse, AggregatorError> {
        require("type", &query.content_type)?;
        require("id", &query.id)?;

        let key = CacheKey::meta(&query.content_type, &query.id);
        if let Some(CachedValue::Meta(meta)) = self.cache.get(&key) {
            return Ok(MetaResponse { meta: Some(meta) });
        }

        for addon in self
            .registry
            .find_supporting(ResourceKind::Meta, &query.content_type, None)
        {
            let outcome = self
                .guarded(
                    ResourceKind::Meta,
                    &addon,
                    self.transport
                        .fetch_meta(&addon, &query.content_type, &query.id),
                )
                .await;

            if let Some(Some(meta)) = outcome {
                debug!(addon_id = %addon.id, id = %query.id, "Meta resolved");
                self.store(key, CachedValue::Meta(meta.clone()), vec![addon.id.clone()]);
                return Ok(MetaResponse { meta: Some(meta) });
            }
        }

        Ok(MetaResponse::default())
    }

    /// Streams from every capable addon, concatenated in registry order.
    pub async fn get_streams(&self, query: &ItemQuery) -> Result<StreamsResponse, AggregatorError> {
        require("type", &query.content_type)?;
        require("id", &query.id)?;

        let key = CacheKey::streams(&query.content_type, &query.id);
        if let Some(CachedValue::Streams(streams)) = self.cache.get(&key) {
            return Ok(StreamsResponse { streams });
        }

        let addons = self
            .registry
            .find_supporting(ResourceKind::Stream, &query.content_type, None);
        let calls = addons.iter().map(|addon| {
            self.guarded(
                ResourceKind::Stream,
                addon,
                self.transport
                    .fetch_streams(addon, &query.content_type, &query.id),
            )
        });
        let outcomes = join_all(calls).await;

        let mut streams = Vec::new();
        let mut sources = Vec::new();
        for (addon, outcome) in addons.iter().zip(outcomes) {
            let Some(batch) = outcome.filter(|b| !b.is_empty()) else {
                continue;
            };
            sources.push(addon.id.clone());
            streams.extend(batch.into_iter().map(|mut stream| {
                stream.addon_id = Some(addon.id.clone());
                stream
            }));
        }

        if !streams.is_empty() {
            self.store(key, CachedValue::Streams(streams.clone()), sources);
        }
        Ok(StreamsResponse { streams })
    }

    /// Subtitles from every capable addon, concatenated in registry order.
    pub async fn get_subtitles(
        &self,
        query: &ItemQuery,
    ) -> Result<SubtitlesResponse, AggregatorError> {
        require("type", &query.content_type)?;
        require("id", &query.id)?;

        let key = CacheKey::subtitles(&query.content_type, &query.id, &query.extra);
        if let Some(CachedValue::Subtitles(subtitles)) = self.cache.get(&key) {
            return Ok(SubtitlesResponse { subtitles });
        }

        let addons =
            self.registry
                .find_supporting(ResourceKind::Subtitles, &query.content_type, None);
        let calls = addons.iter().map(|addon| {
            self.guarded(
                ResourceKind::Subtitles,
                addon,
                self.transport.fetch_subtitles(
                    addon,
                    &query.content_type,
                    &query.id,
                    &query.extra,
                ),
            )
        });
        let outcomes = join_all(calls).await;

        let mut subtitles = Vec::new();
        let mut sources = Vec::new();
        for (addon, outcome) in addons.iter().zip(outcomes) {
            let Some(batch) = outcome.filter(|b| !b.is_empty()) else {
                continue;
            };
            sources.push(addon.id.clone());
            subtitles.extend(batch.into_iter().map(|mut subtitle| {
                subtitle.addon_id = Some(addon.id.clone());
                subtitle
            }));
        }

        if !subtitles.is_empty() {
            self.store(key, CachedValue::Subtitles(subtitles.clone()), sources);
        }
        Ok(SubtitlesResponse { subtitles })
    }

    /// Free-text search over every search-capable catalog of the requested
    /// types, merged like a catalog.
    pub async fn search(&self, query: &SearchQuery) -> Result<CatalogResponse, AggregatorError> {
        let text = query.query.trim();
        if text.is_empty() {
            return Err(AggregatorError::InvalidRequest(
                "search query cannot be empty".to_string(),
            ));
        }
        let types = query.effective_types();

        let key = CacheKey::search(&types, text);
        if let Some(CachedValue::Catalog(metas)) = self.cache.get(&key) {
            return Ok(CatalogResponse { metas });
        }

        // One call per (addon, type) pair, ordered by type then registry.
        let mut targets: Vec<(AddonDescriptor, String, String)> = Vec::new();
        for content_type in &types {
            for addon in self.registry.find_searchable(content_type) {
                if let Some(catalog) = addon.search_catalog(content_type) {
                    let catalog_id = catalog.id.clone();
                    targets.push((addon, content_type.clone(), catalog_id));
                }
            }
        }
        if targets.is_empty() {
            debug!(query = text, types = ?types, "No search-capable addon");
            return Ok(CatalogResponse::default());
        }

        let mut extra = ExtraParams::new();
        extra.insert("search".to_string(), text.to_string());

        let calls = targets.iter().map(|(addon, content_type, catalog_id)| {
            self.guarded(
                ResourceKind::Catalog,
                addon,
                self.transport
                    .fetch_catalog(addon, content_type, catalog_id, &extra),
            )
        });
        let outcomes = join_all(calls).await;

        let addons: Vec<AddonDescriptor> = targets.into_iter().map(|(a, _, _)| a).collect();
        let (metas, sources) = merge_catalogs(&addons, outcomes);
        if !metas.is_empty() {
            self.store(key, CachedValue::Catalog(metas.clone()), sources);
        }
        Ok(CatalogResponse { metas })
    }

    /// Cache a merged result, unless one of its sources was removed or
    /// disabled while the calls were in flight.
    fn store(&self, key: CacheKey, value: CachedValue, sources: Vec<String>) {
        let stale = sources.iter().find(|id| {
            !self
                .registry
                .get(id)
                .is_some_and(|addon| addon.enabled)
        });
        if let Some(addon_id) = stale {
            debug!(key = %key, addon_id = %addon_id, "Skipping cache write for inactive addon");
            return;
        }
        self.cache.set(key, value, sources);
    }

    /// Run one addon call under the per-call timeout, recording metrics and
    /// turning any failure into `None`.
    async fn guarded<T, F>(&self, resource: ResourceKind, addon: &AddonDescriptor, call: F) -> Option<T>
    where
        F: Future<Output = Result<T, AddonError>>,
    {
        let start = Instant::now();
        let outcome = tokio::time::timeout(self.call_timeout, call).await;
        ADDON_REQUEST_DURATION
            .with_label_values(&[resource.as_str()])
            .observe(start.elapsed().as_secs_f64());

        match outcome {
            Ok(Ok(value)) => {
                ADDON_REQUESTS
                    .with_label_values(&[resource.as_str(), "success"])
                    .inc();
                Some(value)
            }
            Ok(Err(e)) => {
                ADDON_REQUESTS
                    .with_label_values(&[resource.as_str(), "error"])
                    .inc();
                warn!(addon_id = %addon.id, resource = %resource, error = %e, "Addon call failed");
                None
            }
            Err(_) => {
                ADDON_REQUESTS
                    .with_label_values(&[resource.as_str(), "timeout"])
                    .inc();
                warn!(
                    addon_id = %addon.id,
                    resource = %resource,
                    timeout_ms = self.call_timeout.as_millis() as u64,
                    "Addon call timed out"
                );
                None
            }
        }
    }
}

/// Concatenate per-addon catalog outcomes in the given order and dedupe by
/// id. Returns the merged list and the ids of addons that contributed.
fn merge_catalogs(
    addons: &[AddonDescriptor],
    outcomes: Vec<Option<Vec<CatalogItem>>>,
) -> (Vec<CatalogItem>, Vec<String>) {
    let mut sources = Vec::new();
    let mut all = Vec::new();
    for (addon, outcome) in addons.iter().zip(outcomes) {
        if let Some(items) = outcome.filter(|items| !items.is_empty()) {
            sources.push(addon.id.clone());
            all.extend(items);
        }
    }
    (dedupe_by_id(all), sources)
}

fn require(field: &str, value: &str) -> Result<(), AggregatorError> {
    if value.trim().is_empty() {
        return Err(AggregatorError::InvalidRequest(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(())
}
