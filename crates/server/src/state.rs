use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use streamhub_core::{
    AddonLoader, AddonRegistry, AddonService, AddonTransport, Aggregator, Config,
    ExternalCatalog, FallbackProvider, HttpAddonTransport, ResponseCache, SanitizedConfig,
    TmdbClient,
};

/// Shared application state
pub struct AppState {
    config: Config,
    addons: Arc<AddonService>,
    aggregator: Arc<Aggregator>,
    tmdb: Arc<dyn ExternalCatalog>,
    fallback: FallbackProvider,
}

impl AppState {
    /// Wire registry, cache, loader and aggregator around the given transport
    /// and TMDB provider.
    pub fn new(
        config: Config,
        transport: Arc<dyn AddonTransport>,
        tmdb: Arc<dyn ExternalCatalog>,
    ) -> Self {
        let ttl = chrono::Duration::seconds(config.cache.ttl_secs as i64);
        Self::with_cache(config, transport, tmdb, Arc::new(ResponseCache::new(ttl)))
    }

    /// Like [`AppState::new`] with a caller-provided cache (e.g. on a manual clock).
    pub fn with_cache(
        config: Config,
        transport: Arc<dyn AddonTransport>,
        tmdb: Arc<dyn ExternalCatalog>,
        cache: Arc<ResponseCache>,
    ) -> Self {
        let timeout = Duration::from_secs(config.addons.timeout_secs);
        let registry = Arc::new(AddonRegistry::new(Arc::clone(&cache)));
        let loader = Arc::new(AddonLoader::new(
            Arc::clone(&transport),
            Arc::clone(&registry),
        ));
        let addons = Arc::new(AddonService::new(
            Arc::clone(&registry),
            loader,
            config.addons.seeds.clone(),
            timeout,
        ));
        let aggregator = Arc::new(Aggregator::new(registry, cache, transport, timeout));

        Self {
            config,
            addons,
            aggregator,
            tmdb,
            fallback: FallbackProvider::new(),
        }
    }

    /// Build the production state: HTTP addon transport and TMDB client.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let transport = HttpAddonTransport::new(Duration::from_secs(config.addons.timeout_secs))
            .context("Failed to create addon transport")?;
        let tmdb = TmdbClient::new(config.tmdb.clone().unwrap_or_default())
            .context("Failed to create TMDB client")?;

        Ok(Self::new(config, Arc::new(transport), Arc::new(tmdb)))
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn addons(&self) -> &AddonService {
        &self.addons
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn cache(&self) -> &ResponseCache {
        self.aggregator.cache()
    }

    pub fn tmdb(&self) -> &dyn ExternalCatalog {
        self.tmdb.as_ref()
    }

    pub fn fallback(&self) -> &FallbackProvider {
        &self.fallback
    }
}
