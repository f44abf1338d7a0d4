//! Mock addon transport for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::addon::{AddonDescriptor, AddonError, AddonTransport, RawManifest, ResourceKind};
use crate::content::{CatalogItem, ExtraParams, StreamDescriptor, Subtitle};

/// A recorded resource call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedAddonCall {
    pub addon_id: String,
    pub resource: ResourceKind,
    pub content_type: String,
    pub id: String,
    pub extra: ExtraParams,
}

/// Mock implementation of the AddonTransport trait.
///
/// Responses are configured per addon id; manifests per URL. Provides:
/// - Canned catalog/meta/stream/subtitle responses
/// - Per-addon latency and failure injection
/// - Call recording for assertions
///
/// # Example
///
/// ```rust,ignore
/// use streamhub_core::testing::{MockAddonTransport, fixtures};
///
/// let transport = MockAddonTransport::new();
/// transport.set_catalog("cinemeta", vec![fixtures::catalog_item("tt1", "movie", "A")]).await;
/// transport.set_delay("slow", Duration::from_secs(30)).await;
/// ```
#[derive(Debug, Default)]
pub struct MockAddonTransport {
    /// Manifest documents by manifest URL.
    manifests: Arc<RwLock<HashMap<String, serde_json::Value>>>,
    /// Catalog items by addon id (returned for every catalog of that addon).
    catalogs: Arc<RwLock<HashMap<String, Vec<CatalogItem>>>>,
    /// Meta records by addon id, looked up by item id.
    metas: Arc<RwLock<HashMap<String, Vec<CatalogItem>>>>,
    streams: Arc<RwLock<HashMap<String, Vec<StreamDescriptor>>>>,
    subtitles: Arc<RwLock<HashMap<String, Vec<Subtitle>>>>,
    /// Addons whose resource calls fail.
    failing: Arc<RwLock<HashSet<String>>>,
    /// Artificial latency per addon.
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    /// Recorded resource calls.
    calls: Arc<RwLock<Vec<RecordedAddonCall>>>,
}

impl MockAddonTransport {
    /// Create a new mock with no configured responses.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Manifests
    // =========================================================================

    /// Serve `manifest` at `url`.
    pub async fn set_manifest(&self, url: &str, manifest: serde_json::Value) {
        self.manifests
            .write()
            .await
            .insert(url.to_string(), manifest);
    }

    /// Stop serving the manifest at `url` (subsequent fetches fail).
    pub async fn remove_manifest(&self, url: &str) {
        self.manifests.write().await.remove(url);
    }

    // =========================================================================
    // Resource responses
    // =========================================================================

    pub async fn set_catalog(&self, addon_id: &str, items: Vec<CatalogItem>) {
        self.catalogs
            .write()
            .await
            .insert(addon_id.to_string(), items);
    }

    /// Add a meta record served by `addon_id` for `item.id`.
    pub async fn set_meta(&self, addon_id: &str, item: CatalogItem) {
        self.metas
            .write()
            .await
            .entry(addon_id.to_string())
            .or_default()
            .push(item);
    }

    pub async fn set_streams(&self, addon_id: &str, streams: Vec<StreamDescriptor>) {
        self.streams
            .write()
            .await
            .insert(addon_id.to_string(), streams);
    }

    pub async fn set_subtitles(&self, addon_id: &str, subtitles: Vec<Subtitle>) {
        self.subtitles
            .write()
            .await
            .insert(addon_id.to_string(), subtitles);
    }

    // =========================================================================
    // Failure and latency injection
    // =========================================================================

    /// Make every resource call to `addon_id` fail.
    pub async fn fail_addon(&self, addon_id: &str) {
        self.failing.write().await.insert(addon_id.to_string());
    }

    pub async fn recover_addon(&self, addon_id: &str) {
        self.failing.write().await.remove(addon_id);
    }

    /// Delay every resource call to `addon_id`.
    pub async fn set_delay(&self, addon_id: &str, delay: Duration) {
        self.delays
            .write()
            .await
            .insert(addon_id.to_string(), delay);
    }

    // =========================================================================
    // Call recording
    // =========================================================================

    pub async fn recorded_calls(&self) -> Vec<RecordedAddonCall> {
        self.calls.read().await.clone()
    }

    /// Number of `resource` calls made to `addon_id`.
    pub async fn call_count(&self, addon_id: &str, resource: ResourceKind) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.addon_id == addon_id && c.resource == resource)
            .count()
    }

    /// Extra parameters of the most recent call to `addon_id`.
    pub async fn last_extra(&self, addon_id: &str) -> Option<ExtraParams> {
        self.calls
            .read()
            .await
            .iter()
            .rev()
            .find(|c| c.addon_id == addon_id)
            .map(|c| c.extra.clone())
    }

    pub async fn clear_recorded(&self) {
        self.calls.write().await.clear();
    }

    /// Record the call, apply latency and failure injection.
    async fn begin(
        &self,
        addon: &AddonDescriptor,
        resource: ResourceKind,
        content_type: &str,
        id: &str,
        extra: &ExtraParams,
    ) -> Result<(), AddonError> {
        self.calls.write().await.push(RecordedAddonCall {
            addon_id: addon.id.clone(),
            resource,
            content_type: content_type.to_string(),
            id: id.to_string(),
            extra: extra.clone(),
        });

        let delay = self.delays.read().await.get(&addon.id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.read().await.contains(&addon.id) {
            return Err(AddonError::AddonCall {
                addon_id: addon.id.clone(),
                reason: "HTTP 500 Internal Server Error".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AddonTransport for MockAddonTransport {
    async fn fetch_manifest(&self, manifest_url: &str) -> Result<RawManifest, AddonError> {
        let manifest = self.manifests.read().await.get(manifest_url).cloned();
        match manifest {
            Some(value) => serde_json::from_value(value).map_err(|e| AddonError::ManifestInvalid {
                url: manifest_url.to_string(),
                reason: format!("not a manifest document: {}", e),
            }),
            None => Err(AddonError::ManifestFetch {
                url: manifest_url.to_string(),
                reason: "HTTP 404 Not Found".to_string(),
            }),
        }
    }

    async fn fetch_catalog(
        &self,
        addon: &AddonDescriptor,
        content_type: &str,
        catalog_id: &str,
        extra: &ExtraParams,
    ) -> Result<Vec<CatalogItem>, AddonError> {
        self.begin(addon, ResourceKind::Catalog, content_type, catalog_id, extra)
            .await?;
        Ok(self
            .catalogs
            .read()
            .await
            .get(&addon.id)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_meta(
        &self,
        addon: &AddonDescriptor,
        content_type: &str,
        id: &str,
    ) -> Result<Option<CatalogItem>, AddonError> {
        self.begin(addon, ResourceKind::Meta, content_type, id, &ExtraParams::new())
            .await?;
        Ok(self
            .metas
            .read()
            .await
            .get(&addon.id)
            .and_then(|items| items.iter().find(|m| m.id == id))
            .cloned())
    }

    async fn fetch_streams(
        &self,
        addon: &AddonDescriptor,
        content_type: &str,
        id: &str,
    ) -> Result<Vec<StreamDescriptor>, AddonError> {
        self.begin(addon, ResourceKind::Stream, content_type, id, &ExtraParams::new())
            .await?;
        Ok(self
            .streams
            .read()
            .await
            .get(&addon.id)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_subtitles(
        &self,
        addon: &AddonDescriptor,
        content_type: &str,
        id: &str,
        extra: &ExtraParams,
    ) -> Result<Vec<Subtitle>, AddonError> {
        self.begin(addon, ResourceKind::Subtitles, content_type, id, extra)
            .await?;
        Ok(self
            .subtitles
            .read()
            .await
            .get(&addon.id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_unknown_manifest_is_fetch_error() {
        let transport = MockAddonTransport::new();
        assert!(matches!(
            transport.fetch_manifest("https://nope/manifest.json").await,
            Err(AddonError::ManifestFetch { .. })
        ));
    }

    #[tokio::test]
    async fn test_failure_injection_and_recovery() {
        let transport = MockAddonTransport::new();
        let addon = fixtures::stream_addon("s", &["movie"]);
        transport
            .set_streams("s", vec![fixtures::stream("https://s.example/1.mp4")])
            .await;

        transport.fail_addon("s").await;
        assert!(transport.fetch_streams(&addon, "movie", "tt1").await.is_err());

        transport.recover_addon("s").await;
        assert_eq!(
            transport
                .fetch_streams(&addon, "movie", "tt1")
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(transport.call_count("s", ResourceKind::Stream).await, 2);
    }
}
