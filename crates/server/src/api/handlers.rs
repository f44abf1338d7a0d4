use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use streamhub_core::{CacheStats, DataSource, Envelope, SanitizedConfig};
use tracing::info;

use super::ApiResponse;
use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::AppState;

/// GET /api/v1/health
pub async fn health(State(state): State<Arc<AppState>>) -> ApiResponse<serde_json::Value> {
    let registry = state.addons().registry();
    let body = json!({
        "status": "ok",
        "addons": registry.len(),
        "enabledAddons": registry.list_enabled().len(),
        "cacheEntries": state.cache().len(),
    });
    (StatusCode::OK, Json(Envelope::ok(body, DataSource::Addons)))
}

/// GET /api/v1/config
///
/// Effective configuration with the TMDB key redacted.
pub async fn get_config(State(state): State<Arc<AppState>>) -> ApiResponse<SanitizedConfig> {
    (
        StatusCode::OK,
        Json(Envelope::ok(state.sanitized_config(), DataSource::Addons)),
    )
}

/// GET /api/v1/metrics
///
/// Prometheus text exposition, outside the envelope.
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    collect_dynamic_metrics(&state);
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}

/// GET /api/v1/cache/stats
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> ApiResponse<CacheStats> {
    (
        StatusCode::OK,
        Json(Envelope::ok(state.cache().stats(), DataSource::Addons)),
    )
}

/// DELETE /api/v1/cache
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> ApiResponse<CacheStats> {
    let removed = state.cache().clear();
    info!(removed = removed, "Response cache cleared");
    (
        StatusCode::OK,
        Json(Envelope::ok(state.cache().stats(), DataSource::Addons).with_meta("removed", removed)),
    )
}
