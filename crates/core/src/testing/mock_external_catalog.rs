//! Mock external catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::content::CatalogItem;
use crate::external_catalog::{ExternalCatalog, ExternalCatalogError, TmdbCategory};

/// A recorded catalog query for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCatalogQuery {
    Discover {
        content_type: String,
        category: TmdbCategory,
        page: u32,
        api_key: Option<String>,
    },
    Search {
        content_type: String,
        query: String,
    },
    Details {
        content_type: String,
        tmdb_id: u32,
    },
}

/// Mock implementation of the ExternalCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable items per content type
/// - Track queries for assertions
/// - Simulate failures
///
/// # Example
///
/// ```rust,ignore
/// use streamhub_core::testing::{MockExternalCatalog, fixtures};
///
/// let catalog = MockExternalCatalog::new();
/// catalog.add_item(fixtures::catalog_item("tmdb:603", "movie", "The Matrix")).await;
///
/// let results = catalog.search("movie", "matrix", None).await?;
/// assert_eq!(results.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockExternalCatalog {
    /// Items by content type, in insertion order.
    items: Arc<RwLock<HashMap<String, Vec<CatalogItem>>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedCatalogQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ExternalCatalogError>>>,
}

impl MockExternalCatalog {
    /// Create a new empty mock external catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item under its own content type.
    pub async fn add_item(&self, item: CatalogItem) {
        self.items
            .write()
            .await
            .entry(item.content_type.clone())
            .or_default()
            .push(item);
    }

    /// Clear all items.
    pub async fn clear_items(&self) {
        self.items.write().await.clear();
    }

    // =========================================================================
    // Query Recording
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedCatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ExternalCatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<ExternalCatalogError> {
        self.next_error.write().await.take()
    }

    async fn record(&self, query: RecordedCatalogQuery) -> Result<(), ExternalCatalogError> {
        self.queries.write().await.push(query);
        match self.take_error().await {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn items_of(&self, content_type: &str) -> Vec<CatalogItem> {
        self.items
            .read()
            .await
            .get(content_type)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ExternalCatalog for MockExternalCatalog {
    async fn discover(
        &self,
        content_type: &str,
        category: TmdbCategory,
        page: u32,
        api_key: Option<&str>,
    ) -> Result<Vec<CatalogItem>, ExternalCatalogError> {
        self.record(RecordedCatalogQuery::Discover {
            content_type: content_type.to_string(),
            category,
            page,
            api_key: api_key.map(str::to_string),
        })
        .await?;
        Ok(self.items_of(content_type).await)
    }

    async fn search(
        &self,
        content_type: &str,
        query: &str,
        _api_key: Option<&str>,
    ) -> Result<Vec<CatalogItem>, ExternalCatalogError> {
        self.record(RecordedCatalogQuery::Search {
            content_type: content_type.to_string(),
            query: query.to_string(),
        })
        .await?;

        let needle = query.to_lowercase();
        Ok(self
            .items_of(content_type)
            .await
            .into_iter()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .collect())
    }

    async fn details(
        &self,
        content_type: &str,
        tmdb_id: u32,
        _api_key: Option<&str>,
    ) -> Result<CatalogItem, ExternalCatalogError> {
        self.record(RecordedCatalogQuery::Details {
            content_type: content_type.to_string(),
            tmdb_id,
        })
        .await?;

        let wanted = format!("tmdb:{}", tmdb_id);
        self.items_of(content_type)
            .await
            .into_iter()
            .find(|item| item.id == wanted)
            .ok_or_else(|| ExternalCatalogError::NotFound(wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_search_filters_by_name() {
        let catalog = MockExternalCatalog::new();
        catalog
            .add_item(fixtures::catalog_item("tmdb:603", "movie", "The Matrix"))
            .await;
        catalog
            .add_item(fixtures::catalog_item("tmdb:13", "movie", "Forrest Gump"))
            .await;

        let results = catalog.search("movie", "matrix", None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(catalog.query_count().await, 1);
    }

    #[tokio::test]
    async fn test_details_not_found() {
        let catalog = MockExternalCatalog::new();
        assert!(matches!(
            catalog.details("movie", 1, None).await,
            Err(ExternalCatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_next_error_applies_once() {
        let catalog = MockExternalCatalog::new();
        catalog
            .set_next_error(ExternalCatalogError::RateLimitExceeded)
            .await;

        assert!(catalog
            .discover("movie", TmdbCategory::Popular, 1, None)
            .await
            .is_err());
        assert!(catalog
            .discover("movie", TmdbCategory::Popular, 1, None)
            .await
            .is_ok());
    }
}
