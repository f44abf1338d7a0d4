//! Structured cache keys.

use serde::Serialize;
use std::fmt;

use crate::content::ExtraParams;

/// Aggregator operation a cache entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheOperation {
    Catalog,
    Meta,
    Streams,
    Subtitles,
    Search,
}

impl CacheOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOperation::Catalog => "catalog",
            CacheOperation::Meta => "meta",
            CacheOperation::Streams => "streams",
            CacheOperation::Subtitles => "subtitles",
            CacheOperation::Search => "search",
        }
    }
}

impl fmt::Display for CacheOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of a cached aggregator response.
///
/// Two logically identical requests always produce equal keys: `extra` is a
/// sorted map, so `{a:1,b:2}` and `{b:2,a:1}` collide on the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub operation: CacheOperation,
    pub content_type: String,
    pub id: String,
    pub extra: ExtraParams,
}

impl CacheKey {
    pub fn new(
        operation: CacheOperation,
        content_type: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            content_type: content_type.into(),
            id: id.into(),
            extra: ExtraParams::new(),
        }
    }

    pub fn with_extra(mut self, extra: &ExtraParams) -> Self {
        self.extra = extra.clone();
        self
    }

    pub fn catalog(content_type: &str, id: &str, extra: &ExtraParams) -> Self {
        Self::new(CacheOperation::Catalog, content_type, id).with_extra(extra)
    }

    pub fn meta(content_type: &str, id: &str) -> Self {
        Self::new(CacheOperation::Meta, content_type, id)
    }

    pub fn streams(content_type: &str, id: &str) -> Self {
        Self::new(CacheOperation::Streams, content_type, id)
    }

    pub fn subtitles(content_type: &str, id: &str, extra: &ExtraParams) -> Self {
        Self::new(CacheOperation::Subtitles, content_type, id).with_extra(extra)
    }

    pub fn search(types: &[String], query: &str) -> Self {
        Self::new(
            CacheOperation::Search,
            types.join(","),
            query.trim(),
        )
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.operation, self.content_type, self.id)?;
        if !self.extra.is_empty() {
            let serialized: Vec<String> = self
                .extra
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, ":{}", serialized.join("&"))?;
        }
        Ok(())
    }
}
