//! Addon management handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use streamhub_core::{
    AddonDescriptor, AddonError, AddonHealth, AvailableAddon, DataSource, Envelope,
};
use tracing::{info, warn};

use super::{failure, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddAddonRequest {
    pub url: String,
}

/// HTTP status for an addon management failure.
fn error_status(error: &AddonError) -> StatusCode {
    match error {
        AddonError::ManifestFetch { .. } | AddonError::AddonCall { .. } => StatusCode::BAD_GATEWAY,
        AddonError::ManifestInvalid { .. } | AddonError::InvalidDescriptor(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AddonError::NotFound(_) => StatusCode::NOT_FOUND,
        AddonError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn addon_failure<T>(error: AddonError) -> ApiResponse<T> {
    let status = error_status(&error);
    if status.is_server_error() {
        warn!(error = %error, "Addon operation failed");
    }
    failure(status, DataSource::Addons, error.to_string())
}

/// GET /api/v1/addons
pub async fn list_addons(State(state): State<Arc<AppState>>) -> ApiResponse<Vec<AddonDescriptor>> {
    (
        StatusCode::OK,
        Json(Envelope::ok(state.addons().list(), DataSource::Addons)),
    )
}

/// GET /api/v1/addons/available
///
/// Configured seed addons and whether each is loaded.
pub async fn list_available(
    State(state): State<Arc<AppState>>,
) -> ApiResponse<Vec<AvailableAddon>> {
    (
        StatusCode::OK,
        Json(Envelope::ok(state.addons().available(), DataSource::Addons)),
    )
}

/// GET /api/v1/addons/health
pub async fn addon_health(State(state): State<Arc<AppState>>) -> ApiResponse<Vec<AddonHealth>> {
    let report = state.addons().health().await;
    let healthy = report.iter().filter(|h| h.healthy).count();
    (
        StatusCode::OK,
        Json(Envelope::ok(report, DataSource::Addons).with_meta("healthyCount", healthy)),
    )
}

/// POST /api/v1/addons
///
/// Install an addon from its transport URL.
pub async fn add_addon(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddAddonRequest>,
) -> ApiResponse<AddonDescriptor> {
    let url = request.url.trim();
    if url.is_empty() {
        return failure(StatusCode::BAD_REQUEST, DataSource::Addons, "url is required");
    }

    match state.addons().add(url).await {
        Ok(descriptor) => {
            info!(addon_id = %descriptor.id, url = %url, "Addon added via API");
            (
                StatusCode::CREATED,
                Json(Envelope::ok(descriptor, DataSource::Addons)),
            )
        }
        Err(e) => addon_failure(e),
    }
}

/// POST /api/v1/addons/{id}/enable
pub async fn enable_addon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResponse<AddonDescriptor> {
    set_enabled(&state, &id, true).await
}

/// POST /api/v1/addons/{id}/disable
pub async fn disable_addon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResponse<AddonDescriptor> {
    set_enabled(&state, &id, false).await
}

async fn set_enabled(state: &AppState, id: &str, enabled: bool) -> ApiResponse<AddonDescriptor> {
    match state.addons().set_enabled(id, enabled).await {
        Ok(descriptor) => (
            StatusCode::OK,
            Json(Envelope::ok(descriptor, DataSource::Addons)),
        ),
        Err(e) => addon_failure(e),
    }
}

/// DELETE /api/v1/addons/{id}
pub async fn remove_addon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResponse<AddonDescriptor> {
    match state.addons().remove(&id) {
        Ok(descriptor) => {
            info!(addon_id = %id, "Addon removed via API");
            (
                StatusCode::OK,
                Json(Envelope::ok(descriptor, DataSource::Addons)),
            )
        }
        Err(e) => addon_failure(e),
    }
}
