//! Outbound calls to the addon transport.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::content::{CatalogItem, ExtraParams, StreamDescriptor, Subtitle};

use super::{AddonDescriptor, AddonError, RawManifest, ResourceKind};

/// Default per-call timeout.
pub const DEFAULT_ADDON_TIMEOUT: Duration = Duration::from_secs(10);

/// Access to addons over their HTTP transport.
///
/// Implemented by [`HttpAddonTransport`] and by the in-crate mock used in
/// tests.
#[async_trait]
pub trait AddonTransport: Send + Sync {
    /// Fetch and parse a manifest document.
    async fn fetch_manifest(&self, manifest_url: &str) -> Result<RawManifest, AddonError>;

    /// `GET {base}/catalog/{type}/{id}.json?{extra}`
    async fn fetch_catalog(
        &self,
        addon: &AddonDescriptor,
        content_type: &str,
        catalog_id: &str,
        extra: &ExtraParams,
    ) -> Result<Vec<CatalogItem>, AddonError>;

    /// `GET {base}/meta/{type}/{id}.json`
    async fn fetch_meta(
        &self,
        addon: &AddonDescriptor,
        content_type: &str,
        id: &str,
    ) -> Result<Option<CatalogItem>, AddonError>;

    /// `GET {base}/stream/{type}/{id}.json`
    async fn fetch_streams(
        &self,
        addon: &AddonDescriptor,
        content_type: &str,
        id: &str,
    ) -> Result<Vec<StreamDescriptor>, AddonError>;

    /// `GET {base}/subtitles/{type}/{id}.json?{extra}`
    async fn fetch_subtitles(
        &self,
        addon: &AddonDescriptor,
        content_type: &str,
        id: &str,
        extra: &ExtraParams,
    ) -> Result<Vec<Subtitle>, AddonError>;
}

/// Build the URL of a resource on an addon.
pub fn resource_url(base_url: &str, resource: ResourceKind, content_type: &str, id: &str) -> String {
    format!(
        "{}/{}/{}/{}.json",
        base_url.trim_end_matches('/'),
        resource.as_str(),
        urlencoding::encode(content_type),
        urlencoding::encode(id)
    )
}

/// reqwest-backed transport.
pub struct HttpAddonTransport {
    client: Client,
}

impl HttpAddonTransport {
    /// Create a transport whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, AddonError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AddonError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        addon: &AddonDescriptor,
        url: &str,
        extra: Option<&ExtraParams>,
    ) -> Result<T, AddonError> {
        debug!(addon_id = %addon.id, url = url, "Addon request");

        let mut request = self.client.get(url);
        if let Some(extra) = extra.filter(|e| !e.is_empty()) {
            request = request.query(extra);
        }

        let response = request
            .send()
            .await
            .map_err(|e| call_error(addon, describe_reqwest_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(call_error(addon, format!("HTTP {}", status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| call_error(addon, format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl AddonTransport for HttpAddonTransport {
    async fn fetch_manifest(&self, manifest_url: &str) -> Result<RawManifest, AddonError> {
        debug!(url = manifest_url, "Fetching addon manifest");

        let fetch_error = |reason: String| AddonError::ManifestFetch {
            url: manifest_url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(manifest_url)
            .send()
            .await
            .map_err(|e| fetch_error(describe_reqwest_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_error(describe_reqwest_error(&e)))?;

        serde_json::from_slice(&body).map_err(|e| AddonError::ManifestInvalid {
            url: manifest_url.to_string(),
            reason: format!("not a manifest document: {}", e),
        })
    }

    async fn fetch_catalog(
        &self,
        addon: &AddonDescriptor,
        content_type: &str,
        catalog_id: &str,
        extra: &ExtraParams,
    ) -> Result<Vec<CatalogItem>, AddonError> {
        let url = resource_url(
            &addon.transport_url,
            ResourceKind::Catalog,
            content_type,
            catalog_id,
        );
        let response: CatalogResponse = self.get_json(addon, &url, Some(extra)).await?;
        Ok(parse_items(addon, response.metas))
    }

    async fn fetch_meta(
        &self,
        addon: &AddonDescriptor,
        content_type: &str,
        id: &str,
    ) -> Result<Option<CatalogItem>, AddonError> {
        let url = resource_url(&addon.transport_url, ResourceKind::Meta, content_type, id);
        let response: MetaResponse = self.get_json(addon, &url, None).await?;
        Ok(response.meta.and_then(CatalogItem::from_value))
    }

    async fn fetch_streams(
        &self,
        addon: &AddonDescriptor,
        content_type: &str,
        id: &str,
    ) -> Result<Vec<StreamDescriptor>, AddonError> {
        let url = resource_url(&addon.transport_url, ResourceKind::Stream, content_type, id);
        let response: StreamsResponse = self.get_json(addon, &url, None).await?;
        Ok(response
            .streams
            .into_iter()
            .filter_map(|s| serde_json::from_value(s).ok())
            .collect())
    }

    async fn fetch_subtitles(
        &self,
        addon: &AddonDescriptor,
        content_type: &str,
        id: &str,
        extra: &ExtraParams,
    ) -> Result<Vec<Subtitle>, AddonError> {
        let url = resource_url(
            &addon.transport_url,
            ResourceKind::Subtitles,
            content_type,
            id,
        );
        let response: SubtitlesResponse = self.get_json(addon, &url, Some(extra)).await?;
        Ok(response
            .subtitles
            .into_iter()
            .filter_map(|s| serde_json::from_value(s).ok())
            .collect())
    }
}

fn call_error(addon: &AddonDescriptor, reason: String) -> AddonError {
    AddonError::AddonCall {
        addon_id: addon.id.clone(),
        reason,
    }
}

fn describe_reqwest_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}

/// Parse catalog entries one by one so a single malformed item does not
/// discard the addon's whole response.
fn parse_items(addon: &AddonDescriptor, raw: Vec<serde_json::Value>) -> Vec<CatalogItem> {
    let total = raw.len();
    let items: Vec<CatalogItem> = raw.into_iter().filter_map(CatalogItem::from_value).collect();
    if items.len() < total {
        debug!(
            addon_id = %addon.id,
            skipped = total - items.len(),
            "Skipped malformed catalog items"
        );
    }
    items
}

// Addon transport response bodies
#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    metas: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MetaResponse {
    #[serde(default)]
    meta: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct StreamsResponse {
    #[serde(default)]
    streams: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SubtitlesResponse {
    #[serde(default)]
    subtitles: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_url() {
        assert_eq!(
            resource_url("https://addon.example/", ResourceKind::Catalog, "movie", "top"),
            "https://addon.example/catalog/movie/top.json"
        );
        assert_eq!(
            resource_url("https://addon.example", ResourceKind::Stream, "series", "tt1:1:2"),
            "https://addon.example/stream/series/tt1%3A1%3A2.json"
        );
    }
}
