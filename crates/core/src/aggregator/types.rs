use serde::{Deserialize, Serialize};

use crate::content::{CatalogItem, ExtraParams, StreamDescriptor, Subtitle};

/// Content types searched when a search query names none.
pub const DEFAULT_SEARCH_TYPES: &[&str] = &["movie", "series"];

/// Catalog request: `{type, catalog id, extra}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    pub content_type: String,
    pub id: String,
    #[serde(default)]
    pub extra: ExtraParams,
}

impl CatalogQuery {
    pub fn new(content_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            id: id.into(),
            extra: ExtraParams::new(),
        }
    }

    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// Request addressed to a single content item (meta, streams, subtitles).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemQuery {
    pub content_type: String,
    pub id: String,
    #[serde(default)]
    pub extra: ExtraParams,
}

impl ItemQuery {
    pub fn new(content_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            id: id.into(),
            extra: ExtraParams::new(),
        }
    }
}

/// Free-text search across search-capable catalogs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    /// Empty means [`DEFAULT_SEARCH_TYPES`].
    #[serde(default)]
    pub types: Vec<String>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            types: Vec::new(),
        }
    }

    pub fn with_type(mut self, content_type: impl Into<String>) -> Self {
        self.types.push(content_type.into());
        self
    }

    /// Requested types, or the defaults when none were given.
    pub fn effective_types(&self) -> Vec<String> {
        let types: Vec<String> = self
            .types
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if types.is_empty() {
            DEFAULT_SEARCH_TYPES.iter().map(|t| t.to_string()).collect()
        } else {
            types
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogResponse {
    pub metas: Vec<CatalogItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetaResponse {
    pub meta: Option<CatalogItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StreamsResponse {
    pub streams: Vec<StreamDescriptor>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SubtitlesResponse {
    pub subtitles: Vec<Subtitle>,
}
