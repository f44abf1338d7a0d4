//! Addon management: seeds from config, add/enable/remove, health probes.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::config::AddonSeed;

use super::{manifest_location, AddonDescriptor, AddonError, AddonLoader, AddonRegistry};

/// A configured addon and whether it is currently registered.
#[derive(Debug, Clone, Serialize)]
pub struct AvailableAddon {
    pub id: String,
    pub url: String,
    /// Enabled flag from config.
    pub configured_enabled: bool,
    pub loaded: bool,
    /// Current registry state (false when not loaded).
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Result of probing one addon's manifest.
#[derive(Debug, Clone, Serialize)]
pub struct AddonHealth {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub healthy: bool,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

/// Composition of registry and loader behind the write-style endpoints.
pub struct AddonService {
    registry: Arc<AddonRegistry>,
    loader: Arc<AddonLoader>,
    seeds: Vec<AddonSeed>,
    probe_timeout: Duration,
}

impl AddonService {
    pub fn new(
        registry: Arc<AddonRegistry>,
        loader: Arc<AddonLoader>,
        seeds: Vec<AddonSeed>,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            loader,
            seeds,
            probe_timeout,
        }
    }

    pub fn registry(&self) -> &Arc<AddonRegistry> {
        &self.registry
    }

    /// Load every enabled seed, in config order. Failures are logged and
    /// skipped; returns the number of addons loaded.
    pub async fn load_seeds(&self) -> usize {
        let mut loaded = 0;
        for seed in self.seeds.iter().filter(|s| s.enabled) {
            match self.loader.load(&seed.url).await {
                Ok(descriptor) => {
                    if descriptor.id != seed.id {
                        warn!(
                            seed_id = %seed.id,
                            manifest_id = %descriptor.id,
                            "Seed id does not match manifest id"
                        );
                    }
                    loaded += 1;
                }
                Err(e) => warn!(seed_id = %seed.id, error = %e, "Failed to load seed addon"),
            }
        }
        info!(loaded = loaded, configured = self.seeds.len(), "Seed addons loaded");
        loaded
    }

    /// Install an addon from its transport URL.
    pub async fn add(&self, url: &str) -> Result<AddonDescriptor, AddonError> {
        self.loader.load(url).await
    }

    /// Enable or disable an addon.
    ///
    /// Enabling an id that is not registered loads it when it matches a
    /// configured seed.
    pub async fn set_enabled(&self, id: &str, enabled: bool) -> Result<AddonDescriptor, AddonError> {
        if self.registry.contains(id) {
            return self.registry.set_enabled(id, enabled);
        }

        match self.seeds.iter().find(|s| s.id == id) {
            Some(seed) if enabled => {
                info!(addon_id = id, url = %seed.url, "Loading seed addon on enable");
                self.loader.load(&seed.url).await
            }
            _ => Err(AddonError::NotFound(id.to_string())),
        }
    }

    /// Remove an addon and its cached responses.
    pub fn remove(&self, id: &str) -> Result<AddonDescriptor, AddonError> {
        self.registry.unregister(id)
    }

    pub fn list(&self) -> Vec<AddonDescriptor> {
        self.registry.list()
    }

    /// Configured seeds with their current state.
    pub fn available(&self) -> Vec<AvailableAddon> {
        self.seeds
            .iter()
            .map(|seed| {
                let (base_url, _) = manifest_location(&seed.url);
                let registered = self.registry.get(&seed.id).or_else(|| {
                    self.registry
                        .list()
                        .into_iter()
                        .find(|a| a.transport_url == base_url)
                });
                AvailableAddon {
                    id: seed.id.clone(),
                    url: seed.url.clone(),
                    configured_enabled: seed.enabled,
                    loaded: registered.is_some(),
                    enabled: registered.as_ref().map(|a| a.enabled).unwrap_or(false),
                    name: registered.map(|a| a.name),
                }
            })
            .collect()
    }

    /// Probe every registered addon's manifest concurrently.
    pub async fn health(&self) -> Vec<AddonHealth> {
        let addons = self.registry.list();
        let transport = self.loader.transport();

        let probes = addons.iter().map(|addon| async move {
            let (_, manifest_url) = manifest_location(&addon.transport_url);
            let start = Instant::now();
            let outcome =
                tokio::time::timeout(self.probe_timeout, transport.fetch_manifest(&manifest_url))
                    .await;
            let latency_ms = start.elapsed().as_millis() as u64;

            let error = match outcome {
                Ok(Ok(_)) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(_) => Some(format!("timed out after {:?}", self.probe_timeout)),
            };

            AddonHealth {
                id: addon.id.clone(),
                name: addon.name.clone(),
                enabled: addon.enabled,
                healthy: error.is_none(),
                latency_ms,
                error,
                checked_at: Utc::now(),
            }
        });

        join_all(probes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addon::AddonTransport;
    use crate::cache::ResponseCache;
    use crate::testing::MockAddonTransport;
    use serde_json::json;

    fn seed(id: &str, url: &str, enabled: bool) -> AddonSeed {
        AddonSeed {
            id: id.to_string(),
            url: url.to_string(),
            enabled,
        }
    }

    async fn service(seeds: Vec<AddonSeed>) -> (AddonService, Arc<MockAddonTransport>) {
        let transport = Arc::new(MockAddonTransport::new());
        for (id, host) in [("a", "https://a.example"), ("b", "https://b.example")] {
            transport
                .set_manifest(
                    &format!("{}/manifest.json", host),
                    json!({"id": id, "name": id.to_uppercase(), "resources": ["meta"], "types": ["movie"]}),
                )
                .await;
        }

        let registry = Arc::new(AddonRegistry::new(Arc::new(ResponseCache::default())));
        let loader = Arc::new(AddonLoader::new(
            Arc::clone(&transport) as Arc<dyn AddonTransport>,
            Arc::clone(&registry),
        ));
        let service = AddonService::new(registry, loader, seeds, Duration::from_secs(1));
        (service, transport)
    }

    #[tokio::test]
    async fn test_load_seeds_skips_disabled_and_failures() {
        let (service, _) = service(vec![
            seed("a", "https://a.example", true),
            seed("b", "https://b.example", false),
            seed("broken", "https://broken.example", true),
        ])
        .await;

        assert_eq!(service.load_seeds().await, 1);
        let ids: Vec<_> = service.list().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[tokio::test]
    async fn test_enable_unloaded_seed_loads_it() {
        let (service, _) = service(vec![seed("b", "https://b.example", false)]).await;
        service.load_seeds().await;
        assert!(service.list().is_empty());

        let descriptor = service.set_enabled("b", true).await.unwrap();
        assert_eq!(descriptor.id, "b");
        assert!(descriptor.enabled);

        let available = service.available();
        assert!(available[0].loaded);
        assert!(available[0].enabled);
        assert_eq!(available[0].name.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_disable_unknown_is_not_found() {
        let (service, _) = service(vec![seed("b", "https://b.example", false)]).await;
        assert!(matches!(
            service.set_enabled("b", false).await,
            Err(AddonError::NotFound(_))
        ));
        assert!(matches!(
            service.set_enabled("nope", true).await,
            Err(AddonError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_health_reports_failures() {
        let (service, transport) = service(vec![]).await;
        service.add("https://a.example").await.unwrap();
        service.add("https://b.example").await.unwrap();
        transport.remove_manifest("https://b.example/manifest.json").await;

        let health = service.health().await;
        assert_eq!(health.len(), 2);
        assert!(health[0].healthy);
        assert!(!health[1].healthy);
        assert!(health[1].error.is_some());
    }

    #[tokio::test]
    async fn test_remove() {
        let (service, _) = service(vec![]).await;
        service.add("https://a.example").await.unwrap();
        service.remove("a").unwrap();
        assert!(service.list().is_empty());
        assert!(matches!(service.remove("a"), Err(AddonError::NotFound(_))));
    }
}
