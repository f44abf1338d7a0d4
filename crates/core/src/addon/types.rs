//! Addon descriptors and the raw manifest shape they are validated from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A resource an addon can serve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Catalog,
    Meta,
    Stream,
    Subtitles,
}

impl ResourceKind {
    /// Path segment used by the addon transport.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Catalog => "catalog",
            ResourceKind::Meta => "meta",
            ResourceKind::Stream => "stream",
            ResourceKind::Subtitles => "subtitles",
        }
    }

    /// Parse a manifest resource name. Unknown resources yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "catalog" => Some(ResourceKind::Catalog),
            "meta" => Some(ResourceKind::Meta),
            "stream" => Some(ResourceKind::Stream),
            "subtitles" => Some(ResourceKind::Subtitles),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An extra parameter a catalog accepts (`search`, `genre`, `skip`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogExtra {
    pub name: String,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// A catalog declared in an addon manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogDescriptor {
    #[serde(rename = "type")]
    pub content_type: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub extra: Vec<CatalogExtra>,
}

impl CatalogDescriptor {
    /// Whether the catalog declares the named extra parameter.
    pub fn accepts_extra(&self, name: &str) -> bool {
        self.extra.iter().any(|e| e.name == name)
    }
}

/// A validated, registered addon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddonDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Base URL; resource paths are appended to it.
    pub transport_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub resources: BTreeSet<ResourceKind>,
    pub types: BTreeSet<String>,
    #[serde(default)]
    pub catalogs: Vec<CatalogDescriptor>,
    pub enabled: bool,
}

impl AddonDescriptor {
    /// Whether the addon serves `resource` for `content_type`.
    pub fn supports(&self, resource: ResourceKind, content_type: &str) -> bool {
        self.resources.contains(&resource) && self.types.contains(content_type)
    }

    /// Whether the addon declares the catalog `{content_type, catalog_id}`.
    pub fn has_catalog(&self, content_type: &str, catalog_id: &str) -> bool {
        self.catalogs
            .iter()
            .any(|c| c.content_type == content_type && c.id == catalog_id)
    }

    /// First catalog of `content_type` that accepts a `search` extra.
    pub fn search_catalog(&self, content_type: &str) -> Option<&CatalogDescriptor> {
        self.catalogs
            .iter()
            .find(|c| c.content_type == content_type && c.accepts_extra("search"))
    }
}

// ============================================================================
// Raw manifest (untrusted, straight off the wire)
// ============================================================================

/// An addon manifest as fetched. Every field is optional so that a missing
/// field is reported as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawManifest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub resources: Option<Vec<RawResource>>,
    #[serde(default)]
    pub types: Option<Vec<String>>,
    #[serde(default)]
    pub catalogs: Vec<CatalogDescriptor>,
}

/// A manifest resource: either a bare name or an object with its own types.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawResource {
    Short(String),
    Full {
        name: String,
        #[serde(default)]
        types: Vec<String>,
    },
}

impl RawResource {
    pub fn name(&self) -> &str {
        match self {
            RawResource::Short(name) => name,
            RawResource::Full { name, .. } => name,
        }
    }

    pub fn types(&self) -> &[String] {
        match self {
            RawResource::Short(_) => &[],
            RawResource::Full { types, .. } => types,
        }
    }
}
