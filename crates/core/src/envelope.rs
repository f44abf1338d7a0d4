//! Uniform response envelope for every API body.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

use crate::addon::AddonDescriptor;
use crate::aggregator::{CatalogResponse, MetaResponse, StreamsResponse, SubtitlesResponse};
use crate::cache::CacheStats;
use crate::config::SanitizedConfig;
use crate::metrics::FALLBACK_RESPONSES;

/// Where the data in an envelope came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Addons,
    Tmdb,
    MockFallback,
    MockFallbackError,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Addons => "addons",
            DataSource::Tmdb => "tmdb",
            DataSource::MockFallback => "mock_fallback",
            DataSource::MockFallbackError => "mock_fallback_error",
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, DataSource::MockFallback | DataSource::MockFallbackError)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Something that can be counted for `metadata.itemCount`.
pub trait Payload {
    fn item_count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

impl<T> Payload for Vec<T> {
    fn item_count(&self) -> usize {
        self.len()
    }
}

impl Payload for CatalogResponse {
    fn item_count(&self) -> usize {
        self.metas.len()
    }
}

impl Payload for MetaResponse {
    fn item_count(&self) -> usize {
        usize::from(self.meta.is_some())
    }
}

impl Payload for StreamsResponse {
    fn item_count(&self) -> usize {
        self.streams.len()
    }
}

impl Payload for SubtitlesResponse {
    fn item_count(&self) -> usize {
        self.subtitles.len()
    }
}

impl Payload for AddonDescriptor {
    fn item_count(&self) -> usize {
        1
    }
}

impl Payload for CacheStats {
    fn item_count(&self) -> usize {
        self.entries
    }
}

impl Payload for SanitizedConfig {
    fn item_count(&self) -> usize {
        1
    }
}

impl Payload for Value {
    fn item_count(&self) -> usize {
        match self {
            Value::Null => 0,
            Value::Array(items) => items.len(),
            _ => 1,
        }
    }
}

/// `metadata` block of an envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeMetadata {
    pub timestamp: DateTime<Utc>,
    pub source: DataSource,
    pub item_count: usize,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `{ success, data, metadata, error? }`
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub metadata: EnvelopeMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Payload> Envelope<T> {
    /// Successful envelope.
    pub fn ok(data: T, source: DataSource) -> Self {
        let item_count = data.item_count();
        Self {
            success: true,
            data: Some(data),
            metadata: EnvelopeMetadata::new(source, item_count),
            error: None,
        }
    }

    /// Pick between a primary outcome and fallback data.
    ///
    /// A non-empty primary result is served as-is with `source`; an empty one
    /// is replaced by `fallback()` marked `mock_fallback`; an error is
    /// replaced by `fallback()` marked `mock_fallback_error` and carries the
    /// error message.
    pub fn resolve<E, F>(source: DataSource, outcome: Result<T, E>, fallback: F) -> Self
    where
        E: fmt::Display,
        F: FnOnce() -> T,
    {
        match outcome {
            Ok(data) if !data.is_empty() => Self::ok(data, source),
            Ok(_) => {
                FALLBACK_RESPONSES
                    .with_label_values(&[DataSource::MockFallback.as_str()])
                    .inc();
                Self::ok(fallback(), DataSource::MockFallback)
            }
            Err(e) => {
                warn!(source = %source, error = %e, "Serving fallback data after error");
                FALLBACK_RESPONSES
                    .with_label_values(&[DataSource::MockFallbackError.as_str()])
                    .inc();
                let mut envelope = Self::ok(fallback(), DataSource::MockFallbackError);
                envelope.error = Some(e.to_string());
                envelope
            }
        }
    }

    /// [`Envelope::resolve`] for addon-backed reads.
    pub fn from_outcome<E, F>(outcome: Result<T, E>, fallback: F) -> Self
    where
        E: fmt::Display,
        F: FnOnce() -> T,
    {
        Self::resolve(DataSource::Addons, outcome, fallback)
    }
}

impl<T> Envelope<T> {
    /// Failed envelope without data.
    pub fn failure(source: DataSource, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            metadata: EnvelopeMetadata::new(source, 0),
            error: Some(error.into()),
        }
    }

    /// Attach an extra metadata field.
    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn source(&self) -> DataSource {
        self.metadata.source
    }
}

impl EnvelopeMetadata {
    fn new(source: DataSource, item_count: usize) -> Self {
        Self {
            timestamp: Utc::now(),
            source,
            item_count,
            extra: Map::new(),
        }
    }
}
