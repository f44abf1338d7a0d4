//! TMDB handlers.
//!
//! Same envelope contract as the addon reads: `source = tmdb` on success,
//! fallback data when TMDB is unreachable, unconfigured or returns nothing.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use streamhub_core::{
    external_catalog::parse_tmdb_id, CatalogResponse, DataSource, Envelope, ExternalCatalogError,
    MetaResponse, Payload, TmdbCategory,
};

use super::{failure, ApiResponse};
use crate::state::AppState;

/// Items in a fallback list.
const FALLBACK_COUNT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct TmdbListParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbSearchParams {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_type", rename = "type")]
    pub content_type: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbKeyParams {
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_type() -> String {
    "movie".to_string()
}

/// Per-request key, ignoring blanks.
fn request_key(api_key: &Option<String>) -> Option<&str> {
    api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
}

/// Wrap a TMDB outcome; malformed requests are rejected instead of masked.
fn resolve<T, F>(outcome: Result<T, ExternalCatalogError>, fallback: F) -> ApiResponse<T>
where
    T: Payload + serde::Serialize,
    F: FnOnce() -> T,
{
    match outcome {
        Err(ExternalCatalogError::InvalidRequest(message)) => {
            failure(StatusCode::BAD_REQUEST, DataSource::Tmdb, message)
        }
        outcome => (
            StatusCode::OK,
            Json(Envelope::resolve(DataSource::Tmdb, outcome, fallback)),
        ),
    }
}

/// GET /api/v1/tmdb/{type}/{category}
///
/// `popular`, `top_rated` or `trending` list for `movie` or `series`.
pub async fn discover(
    State(state): State<Arc<AppState>>,
    Path((content_type, category)): Path<(String, String)>,
    Query(params): Query<TmdbListParams>,
) -> ApiResponse<CatalogResponse> {
    let category = match category.parse::<TmdbCategory>() {
        Ok(category) => category,
        Err(e) => return failure(StatusCode::BAD_REQUEST, DataSource::Tmdb, e.to_string()),
    };

    let outcome = state
        .tmdb()
        .discover(
            &content_type,
            category,
            params.page.max(1),
            request_key(&params.api_key),
        )
        .await
        .map(|metas| CatalogResponse { metas });

    let (status, Json(envelope)) = resolve(outcome, || {
        state
            .fallback()
            .mock_catalog(&content_type, category.as_str(), FALLBACK_COUNT)
    });
    (
        status,
        Json(
            envelope
                .with_meta("category", category.as_str())
                .with_meta("page", params.page.max(1)),
        ),
    )
}

/// GET /api/v1/tmdb/search?query=&type=
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TmdbSearchParams>,
) -> ApiResponse<CatalogResponse> {
    let query = params.query.trim();
    if query.is_empty() {
        return failure(StatusCode::BAD_REQUEST, DataSource::Tmdb, "query is required");
    }

    let outcome = state
        .tmdb()
        .search(&params.content_type, query, request_key(&params.api_key))
        .await
        .map(|metas| CatalogResponse { metas });

    resolve(outcome, || {
        state
            .fallback()
            .mock_search(query, Some(params.content_type.as_str()), FALLBACK_COUNT)
    })
}

/// GET /api/v1/tmdb/{type}/details/{id}
///
/// `id` may be bare (`603`) or prefixed (`tmdb:603`).
pub async fn details(
    State(state): State<Arc<AppState>>,
    Path((content_type, id)): Path<(String, String)>,
    Query(params): Query<TmdbKeyParams>,
) -> ApiResponse<MetaResponse> {
    let tmdb_id = match parse_tmdb_id(&id) {
        Ok(tmdb_id) => tmdb_id,
        Err(e) => return failure(StatusCode::BAD_REQUEST, DataSource::Tmdb, e.to_string()),
    };

    let outcome = state
        .tmdb()
        .details(&content_type, tmdb_id, request_key(&params.api_key))
        .await
        .map(|item| MetaResponse { meta: Some(item) });

    let (status, Json(envelope)) =
        resolve(outcome, || state.fallback().mock_meta(&content_type, &id));
    if status.is_success() && envelope.data.as_ref().is_none_or(|d| d.is_empty()) {
        return failure(
            StatusCode::NOT_FOUND,
            envelope.source(),
            envelope
                .error
                .unwrap_or_else(|| format!("No TMDB record for {}", id)),
        );
    }
    (status, Json(envelope))
}
