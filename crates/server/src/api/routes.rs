use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{addons, content, handlers, middleware::metrics_middleware, tmdb};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Addon management
        .route("/addons", get(addons::list_addons))
        .route("/addons", post(addons::add_addon))
        .route("/addons/available", get(addons::list_available))
        .route("/addons/health", get(addons::addon_health))
        .route("/addons/{id}", delete(addons::remove_addon))
        .route("/addons/{id}/enable", post(addons::enable_addon))
        .route("/addons/{id}/disable", post(addons::disable_addon))
        // Aggregated content
        .route("/discover/{type}/{category}", get(content::discover))
        .route("/catalog/{type}/{id}", get(content::get_catalog))
        .route("/search", get(content::search))
        .route("/meta/{type}/{id}", get(content::get_meta))
        .route("/streams/{type}/{id}", get(content::get_streams))
        .route("/subtitles/{type}/{id}", get(content::get_subtitles))
        // Response cache
        .route("/cache", delete(handlers::clear_cache))
        .route("/cache/stats", get(handlers::cache_stats))
        // TMDB
        .route("/tmdb/search", get(tmdb::search))
        .route("/tmdb/{type}/{category}", get(tmdb::discover))
        .route("/tmdb/{type}/details/{id}", get(tmdb::details))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
