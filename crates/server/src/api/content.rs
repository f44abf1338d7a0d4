//! Content read handlers: discover, catalog, search, meta, streams, subtitles.
//!
//! These always answer 200 with data. When no addon contributes, or the
//! request cannot be aggregated, the fallback dataset is served and
//! `metadata.source` says so. The only failure is an unknown meta id (404).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use streamhub_core::{
    AggregatorError, CatalogQuery, CatalogResponse, Envelope, ItemQuery,
    MetaResponse, Payload, SearchQuery, StreamsResponse, SubtitlesResponse,
};

use super::{failure, ApiResponse};
use crate::state::AppState;

/// Items per discover row when the caller does not say.
pub const DEFAULT_DISCOVER_COUNT: usize = 20;

/// Items returned by mock search and mock catalogs.
const FALLBACK_COUNT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct DiscoverParams {
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub skip: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    #[serde(default, rename = "type")]
    pub content_type: Option<String>,
}

/// Serve an aggregation, or fall back when it came back empty or failed.
fn resolve<T, F>(outcome: Result<T, AggregatorError>, fallback: F) -> ApiResponse<T>
where
    T: Payload + Serialize,
    F: FnOnce() -> T,
{
    (StatusCode::OK, Json(Envelope::from_outcome(outcome, fallback)))
}

/// GET /api/v1/discover/{type}/{category}
///
/// One discover row: the addon catalog `{type, category}` trimmed to `count`.
pub async fn discover(
    State(state): State<Arc<AppState>>,
    Path((content_type, category)): Path<(String, String)>,
    Query(params): Query<DiscoverParams>,
) -> ApiResponse<CatalogResponse> {
    let count = params.count.unwrap_or(DEFAULT_DISCOVER_COUNT).max(1);

    let mut query = CatalogQuery::new(&content_type, &category);
    if let Some(genre) = params.genre.as_deref().filter(|g| !g.trim().is_empty()) {
        query = query.with_extra("genre", genre.trim());
    }
    if let Some(skip) = params.skip.filter(|s| *s > 0) {
        query = query.with_extra("skip", skip.to_string());
    }

    let outcome = state.aggregator().get_catalog(&query).await.map(|mut response| {
        response.metas.truncate(count);
        response
    });

    let (status, Json(envelope)) = resolve(outcome, || {
        state.fallback().mock_catalog(&content_type, &category, count)
    });
    (
        status,
        Json(
            envelope
                .with_meta("contentType", content_type)
                .with_meta("category", category),
        ),
    )
}

/// GET /api/v1/catalog/{type}/{id}
///
/// Raw catalog aggregation; every query parameter is forwarded as an extra.
pub async fn get_catalog(
    State(state): State<Arc<AppState>>,
    Path((content_type, id)): Path<(String, String)>,
    Query(extra): Query<BTreeMap<String, String>>,
) -> ApiResponse<CatalogResponse> {
    let query = CatalogQuery {
        content_type: content_type.clone(),
        id: id.clone(),
        extra,
    };
    let outcome = state.aggregator().get_catalog(&query).await;
    resolve(outcome, || {
        state
            .fallback()
            .mock_catalog(&content_type, &id, FALLBACK_COUNT)
    })
}

/// GET /api/v1/search?query=&type=
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResponse<CatalogResponse> {
    let content_type = params
        .content_type
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let mut query = SearchQuery::new(params.query.clone());
    if let Some(content_type) = &content_type {
        query = query.with_type(content_type.clone());
    }

    let outcome = state.aggregator().search(&query).await;
    let (status, Json(envelope)) = resolve(outcome, || {
        state
            .fallback()
            .mock_search(&params.query, content_type.as_deref(), FALLBACK_COUNT)
    });
    (status, Json(envelope.with_meta("query", params.query.trim())))
}

/// GET /api/v1/meta/{type}/{id}
///
/// Full record for one item. 404 when neither an addon nor the fallback
/// dataset knows the id.
pub async fn get_meta(
    State(state): State<Arc<AppState>>,
    Path((content_type, id)): Path<(String, String)>,
) -> ApiResponse<MetaResponse> {
    let outcome = state
        .aggregator()
        .get_meta(&ItemQuery::new(&content_type, &id))
        .await;

    let (status, Json(envelope)) =
        resolve(outcome, || state.fallback().mock_meta(&content_type, &id));
    if status.is_success() && envelope.data.as_ref().is_none_or(|d| d.is_empty()) {
        return failure(
            StatusCode::NOT_FOUND,
            envelope.source(),
            format!("No metadata found for {} {}", content_type, id),
        );
    }
    (status, Json(envelope))
}

/// GET /api/v1/streams/{type}/{id}
pub async fn get_streams(
    State(state): State<Arc<AppState>>,
    Path((content_type, id)): Path<(String, String)>,
) -> ApiResponse<StreamsResponse> {
    let outcome = state
        .aggregator()
        .get_streams(&ItemQuery::new(&content_type, &id))
        .await;
    resolve(outcome, || state.fallback().mock_streams(&content_type, &id))
}

/// GET /api/v1/subtitles/{type}/{id}
///
/// Query parameters (e.g. `videoHash`, `videoSize`) are forwarded as extras.
pub async fn get_subtitles(
    State(state): State<Arc<AppState>>,
    Path((content_type, id)): Path<(String, String)>,
    Query(extra): Query<BTreeMap<String, String>>,
) -> ApiResponse<SubtitlesResponse> {
    let mut query = ItemQuery::new(&content_type, &id);
    query.extra = extra;

    let outcome = state.aggregator().get_subtitles(&query).await;
    resolve(outcome, || {
        state.fallback().mock_subtitles(&content_type, &id)
    })
}
