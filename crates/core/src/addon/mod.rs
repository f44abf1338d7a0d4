//! Stremio-compatible addon integration.
//!
//! This module holds the registry of known addons, the loader that turns a
//! transport URL into a validated descriptor, the HTTP transport used to
//! query addons, and the service that manages addons on behalf of the API.

mod loader;
mod registry;
mod service;
mod transport;
mod types;

pub use loader::{manifest_location, validate_manifest, AddonLoader};
pub use registry::AddonRegistry;
pub use service::{AddonHealth, AddonService, AvailableAddon};
pub use transport::{resource_url, AddonTransport, HttpAddonTransport, DEFAULT_ADDON_TIMEOUT};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when loading or calling addons.
#[derive(Debug, Error)]
pub enum AddonError {
    /// Network failure, timeout or non-2xx status while fetching a manifest.
    #[error("Failed to fetch manifest from {url}: {reason}")]
    ManifestFetch { url: String, reason: String },

    /// The manifest document is missing required fields.
    #[error("Invalid manifest from {url}: {reason}")]
    ManifestInvalid { url: String, reason: String },

    /// A resource request to a registered addon failed.
    #[error("Addon {addon_id} call failed: {reason}")]
    AddonCall { addon_id: String, reason: String },

    /// Operation on an unknown addon id.
    #[error("Addon not found: {0}")]
    NotFound(String),

    /// Descriptor rejected by the registry.
    #[error("Invalid addon descriptor: {0}")]
    InvalidDescriptor(String),

    /// HTTP client could not be built.
    #[error("Transport error: {0}")]
    Transport(String),
}
