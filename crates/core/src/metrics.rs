//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Addon fan-out (requests per resource, latency)
//! - Response cache (hits, misses, expirations)
//! - Fallback responses served to clients
//! - External services (TMDB)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Addon Metrics
// =============================================================================

/// Addon requests total by resource and outcome.
pub static ADDON_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("streamhub_addon_requests_total", "Total addon requests"),
        &["resource", "outcome"], // outcome: "success", "error", "timeout"
    )
    .unwrap()
});

/// Addon request duration in seconds.
pub static ADDON_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "streamhub_addon_request_duration_seconds",
            "Duration of addon requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["resource"],
    )
    .unwrap()
});

/// Manifest loads by outcome.
pub static MANIFEST_LOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("streamhub_manifest_loads_total", "Total addon manifest loads"),
        &["outcome"], // "success", "fetch_error", "invalid"
    )
    .unwrap()
});

// =============================================================================
// Cache Metrics
// =============================================================================

/// Cache lookups by result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("streamhub_cache_lookups_total", "Response cache lookups"),
        &["operation", "result"], // result: "hit", "miss", "expired"
    )
    .unwrap()
});

// =============================================================================
// Fallback Metrics
// =============================================================================

/// Responses served from the fallback dataset.
pub static FALLBACK_RESPONSES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "streamhub_fallback_responses_total",
            "Responses answered with mock fallback data",
        ),
        &["source"], // "mock_fallback", "mock_fallback_error"
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// External service requests total.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "streamhub_external_service_requests_total",
            "Total external service requests",
        ),
        &["service", "operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Addons
        Box::new(ADDON_REQUESTS.clone()),
        Box::new(ADDON_REQUEST_DURATION.clone()),
        Box::new(MANIFEST_LOADS.clone()),
        // Cache
        Box::new(CACHE_LOOKUPS.clone()),
        // Fallback
        Box::new(FALLBACK_RESPONSES.clone()),
        // External services
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
    ]
}
