//! External catalog integration (TMDB).
//!
//! Discover lists, search and details are mapped onto the same
//! [`CatalogItem`] shape the addons produce so the API can serve either
//! source interchangeably.

mod tmdb;
mod types;

pub use tmdb::{TmdbClient, TmdbConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::content::CatalogItem;

/// Errors that can occur when interacting with external catalogs.
#[derive(Debug, Error)]
pub enum ExternalCatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),

    /// Request parameters the catalog cannot serve.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Trait for external catalog clients.
///
/// `api_key` overrides the configured key for a single call.
#[async_trait]
pub trait ExternalCatalog: Send + Sync {
    /// One page of a curated list.
    async fn discover(
        &self,
        content_type: &str,
        category: TmdbCategory,
        page: u32,
        api_key: Option<&str>,
    ) -> Result<Vec<CatalogItem>, ExternalCatalogError>;

    /// Free-text title search.
    async fn search(
        &self,
        content_type: &str,
        query: &str,
        api_key: Option<&str>,
    ) -> Result<Vec<CatalogItem>, ExternalCatalogError>;

    /// Full record for one title.
    async fn details(
        &self,
        content_type: &str,
        tmdb_id: u32,
        api_key: Option<&str>,
    ) -> Result<CatalogItem, ExternalCatalogError>;
}
