pub mod addon;
pub mod aggregator;
pub mod cache;
pub mod config;
pub mod content;
pub mod envelope;
pub mod external_catalog;
pub mod fallback;
pub mod metrics;
pub mod testing;

pub use addon::{
    AddonDescriptor, AddonError, AddonHealth, AddonLoader, AddonRegistry, AddonService,
    AddonTransport, AvailableAddon, HttpAddonTransport, ResourceKind,
};
pub use aggregator::{
    Aggregator, AggregatorError, CatalogQuery, CatalogResponse, ItemQuery, MetaResponse,
    SearchQuery, StreamsResponse, SubtitlesResponse,
};
pub use cache::{CacheKey, CacheOperation, CacheStats, Clock, ResponseCache, SystemClock};
pub use config::{
    load_config, load_config_from_str, validate_config, AddonSeed, Config, ConfigError,
    SanitizedConfig,
};
pub use content::{CatalogItem, ExtraParams, StreamDescriptor, Subtitle};
pub use envelope::{DataSource, Envelope, EnvelopeMetadata, Payload};
pub use external_catalog::{
    ExternalCatalog, ExternalCatalogError, TmdbCategory, TmdbClient, TmdbConfig,
};
pub use fallback::FallbackProvider;
