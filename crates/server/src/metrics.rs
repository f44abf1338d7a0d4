//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the streamhub server:
//! - HTTP request metrics (latency, counts, in-flight)
//! - Registry and cache sizes (collected dynamically)
//! - Core addon, cache and fallback counters (registered from `streamhub_core`)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "streamhub_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("streamhub_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "streamhub_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Registry / Cache Metrics
// =============================================================================

/// Registered addons (collected dynamically).
pub static ADDONS_REGISTERED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("streamhub_addons_registered", "Number of registered addons").unwrap()
});

/// Enabled addons (collected dynamically).
pub static ADDONS_ENABLED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("streamhub_addons_enabled", "Number of enabled addons").unwrap()
});

/// Live response cache entries (collected dynamically).
pub static CACHE_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("streamhub_cache_entries", "Number of response cache entries").unwrap()
});

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Registry / cache
    registry
        .register(Box::new(ADDONS_REGISTERED.clone()))
        .unwrap();
    registry
        .register(Box::new(ADDONS_ENABLED.clone()))
        .unwrap();
    registry.register(Box::new(CACHE_ENTRIES.clone())).unwrap();

    // Core metrics (addon calls, manifests, cache lookups, fallbacks, TMDB)
    for metric in streamhub_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Update gauges from current application state before encoding.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let registry = state.addons().registry();
    ADDONS_REGISTERED.set(registry.len() as i64);
    ADDONS_ENABLED.set(registry.list_enabled().len() as i64);
    CACHE_ENTRIES.set(state.cache().len() as i64);
}

/// Normalize a path for metric labels (replace content and addon ids with
/// placeholders).
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let mut normalized = Vec::with_capacity(segments.len());

    for (i, segment) in segments.iter().enumerate() {
        let previous = i.checked_sub(1).map(|p| segments[p]);
        let replaced = match previous {
            // /meta/{type}/{id}, /streams/{type}/{id}, /subtitles/{type}/{id}
            _ if i >= 2 && is_item_route(segments[i - 2]) => "{id}",
            // /tmdb/{type}/details/{id}
            Some("details") => "{id}",
            // /addons/{id}[/enable|/disable]
            Some("addons") if !matches!(*segment, "available" | "health" | "") => "{id}",
            _ if is_numeric(segment) => "{id}",
            _ => *segment,
        };
        normalized.push(replaced);
    }

    normalized.join("/")
}

fn is_item_route(segment: &str) -> bool {
    matches!(segment, "meta" | "streams" | "subtitles")
}

fn is_numeric(segment: &str) -> bool {
    static NUMERIC: Lazy<regex_lite::Regex> =
        Lazy::new(|| regex_lite::Regex::new(r"^\d+$").unwrap());
    NUMERIC.is_match(segment)
}
