//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the outbound traits
//! (addon transport, external catalog) so the aggregator and the HTTP API can
//! be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use streamhub_core::testing::{fixtures, MockAddonTransport, MockExternalCatalog};
//!
//! let transport = MockAddonTransport::new();
//! let tmdb = MockExternalCatalog::new();
//!
//! // Configure mock responses
//! transport.set_catalog("cinemeta", vec![fixtures::catalog_item("tt1", "movie", "A")]).await;
//!
//! // Use in AppState...
//! ```

mod mock_addon_transport;
mod mock_external_catalog;

pub use crate::cache::ManualClock;
pub use mock_addon_transport::{MockAddonTransport, RecordedAddonCall};
pub use mock_external_catalog::{MockExternalCatalog, RecordedCatalogQuery};

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Value};
    use std::collections::BTreeSet;

    use crate::addon::{AddonDescriptor, CatalogDescriptor, CatalogExtra, ResourceKind};
    use crate::content::{CatalogItem, StreamDescriptor, Subtitle};

    fn addon(id: &str, resources: &[ResourceKind], types: &[&str]) -> AddonDescriptor {
        AddonDescriptor {
            id: id.to_string(),
            name: format!("Addon {}", id),
            version: Some("1.0.0".to_string()),
            transport_url: format!("https://{}.addons.test", id.trim()),
            description: None,
            resources: resources.iter().copied().collect(),
            types: types.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
            catalogs: Vec::new(),
            enabled: true,
        }
    }

    /// Addon serving a single catalog `{content_type, catalog_id}`.
    pub fn catalog_addon(id: &str, content_type: &str, catalog_id: &str) -> AddonDescriptor {
        let mut descriptor = addon(id, &[ResourceKind::Catalog], &[content_type]);
        descriptor.catalogs.push(CatalogDescriptor {
            content_type: content_type.to_string(),
            id: catalog_id.to_string(),
            name: Some(format!("{} {}", id, catalog_id)),
            extra: Vec::new(),
        });
        descriptor
    }

    /// Addon with a `search` catalog of `content_type`.
    pub fn searchable_addon(id: &str, content_type: &str) -> AddonDescriptor {
        let mut descriptor = addon(id, &[ResourceKind::Catalog], &[content_type]);
        descriptor.catalogs.push(CatalogDescriptor {
            content_type: content_type.to_string(),
            id: "search".to_string(),
            name: None,
            extra: vec![CatalogExtra {
                name: "search".to_string(),
                is_required: true,
                options: Vec::new(),
            }],
        });
        descriptor
    }

    pub fn meta_addon(id: &str, types: &[&str]) -> AddonDescriptor {
        addon(id, &[ResourceKind::Meta], types)
    }

    pub fn stream_addon(id: &str, types: &[&str]) -> AddonDescriptor {
        addon(id, &[ResourceKind::Stream], types)
    }

    pub fn subtitles_addon(id: &str, types: &[&str]) -> AddonDescriptor {
        addon(id, &[ResourceKind::Subtitles], types)
    }

    /// Manifest document for an addon serving catalog and meta for movies.
    pub fn manifest(id: &str, catalog_id: &str) -> Value {
        json!({
            "id": id,
            "name": format!("Addon {}", id),
            "version": "1.0.0",
            "resources": ["catalog", "meta"],
            "types": ["movie"],
            "catalogs": [{"type": "movie", "id": catalog_id, "name": "Top"}]
        })
    }

    pub fn catalog_item(id: &str, content_type: &str, name: &str) -> CatalogItem {
        let mut item = CatalogItem::new(id, content_type, name);
        item.poster = Some(format!("https://img.test/{}.jpg", id));
        item
    }

    pub fn stream(url: &str) -> StreamDescriptor {
        StreamDescriptor {
            name: Some("1080p".to_string()),
            title: None,
            url: url.to_string(),
            addon_id: None,
        }
    }

    pub fn subtitle(id: &str, lang: &str) -> Subtitle {
        Subtitle {
            id: id.to_string(),
            url: format!("https://subs.test/{}.srt", id),
            lang: lang.to_string(),
            addon_id: None,
        }
    }
}
