//! Turns a transport URL into a validated, registered addon.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::metrics::MANIFEST_LOADS;

use super::{AddonDescriptor, AddonError, AddonRegistry, AddonTransport, RawManifest, ResourceKind};

const MANIFEST_FILE: &str = "manifest.json";

/// Split a user-supplied URL into `(base_url, manifest_url)`.
///
/// Accepts either an addon base URL or a direct link to its manifest, and the
/// `stremio://` scheme used by install links.
pub fn manifest_location(url: &str) -> (String, String) {
    let url = url.trim();
    let url = match url.strip_prefix("stremio://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    };
    let trimmed = url.trim_end_matches('/');

    match trimmed.strip_suffix(MANIFEST_FILE) {
        Some(base) => (base.trim_end_matches('/').to_string(), trimmed.to_string()),
        None => (trimmed.to_string(), format!("{}/{}", trimmed, MANIFEST_FILE)),
    }
}

/// Loads addon manifests and registers the resulting descriptors.
pub struct AddonLoader {
    transport: Arc<dyn AddonTransport>,
    registry: Arc<AddonRegistry>,
}

impl AddonLoader {
    pub fn new(transport: Arc<dyn AddonTransport>, registry: Arc<AddonRegistry>) -> Self {
        Self {
            transport,
            registry,
        }
    }

    /// Fetch, validate and register the addon at `url`.
    ///
    /// The registry is only touched once the manifest has been validated, so
    /// a failed load never leaves a partial entry behind.
    pub async fn load(&self, url: &str) -> Result<AddonDescriptor, AddonError> {
        let (base_url, manifest_url) = manifest_location(url);

        let manifest = match self.transport.fetch_manifest(&manifest_url).await {
            Ok(manifest) => manifest,
            Err(e) => {
                let outcome = match e {
                    AddonError::ManifestInvalid { .. } => "invalid",
                    _ => "fetch_error",
                };
                MANIFEST_LOADS.with_label_values(&[outcome]).inc();
                warn!(url = %manifest_url, error = %e, "Failed to fetch addon manifest");
                return Err(e);
            }
        };

        let descriptor = match validate_manifest(&manifest_url, &base_url, manifest) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                MANIFEST_LOADS.with_label_values(&["invalid"]).inc();
                warn!(url = %manifest_url, error = %e, "Rejected addon manifest");
                return Err(e);
            }
        };

        self.registry.register(descriptor.clone())?;
        MANIFEST_LOADS.with_label_values(&["success"]).inc();
        info!(
            addon_id = %descriptor.id,
            name = %descriptor.name,
            resources = ?descriptor.resources,
            "Addon loaded"
        );

        Ok(descriptor)
    }

    pub fn transport(&self) -> &Arc<dyn AddonTransport> {
        &self.transport
    }
}

/// Validate a raw manifest into a descriptor.
///
/// `name`, `resources` and `types` are required; `resources` must name at
/// least one resource this service understands. A manifest without an `id`
/// is keyed by its base URL so reloading the same URL stays idempotent.
pub fn validate_manifest(
    manifest_url: &str,
    base_url: &str,
    manifest: RawManifest,
) -> Result<AddonDescriptor, AddonError> {
    let invalid = |reason: &str| AddonError::ManifestInvalid {
        url: manifest_url.to_string(),
        reason: reason.to_string(),
    };

    let name = manifest
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| invalid("missing 'name'"))?;
    let raw_resources = manifest
        .resources
        .ok_or_else(|| invalid("missing 'resources'"))?;
    let raw_types = manifest.types.ok_or_else(|| invalid("missing 'types'"))?;

    let mut resources = BTreeSet::new();
    let mut types: BTreeSet<String> = raw_types.into_iter().collect();
    for resource in &raw_resources {
        if let Some(kind) = ResourceKind::from_name(resource.name()) {
            resources.insert(kind);
            types.extend(resource.types().iter().cloned());
        }
    }
    if resources.is_empty() {
        return Err(invalid("declares no supported resources"));
    }

    let id = manifest
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| base_url.to_string());

    Ok(AddonDescriptor {
        id,
        name,
        version: manifest.version,
        transport_url: base_url.to_string(),
        description: manifest.description,
        resources,
        types,
        catalogs: manifest.catalogs,
        enabled: true,
    })
}
