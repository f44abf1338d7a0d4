use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Longest accepted response cache TTL (30 days).
pub const MAX_CACHE_TTL_SECS: u64 = 30 * 24 * 60 * 60;

const SEED_URL_SCHEMES: &[&str] = &["http://", "https://", "stremio://"];

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Addon timeout is positive
/// - Cache TTL is positive and at most [`MAX_CACHE_TTL_SECS`]
/// - Seed ids are non-empty and unique, seed URLs are http(s) or stremio
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.addons.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "addons.timeout_secs must be greater than 0".to_string(),
        ));
    }

    if config.cache.ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache.ttl_secs must be greater than 0".to_string(),
        ));
    }

    if config.cache.ttl_secs > MAX_CACHE_TTL_SECS {
        return Err(ConfigError::ValidationError(format!(
            "cache.ttl_secs must be at most {}",
            MAX_CACHE_TTL_SECS
        )));
    }

    let mut seen = HashSet::new();
    for seed in &config.addons.seeds {
        if seed.id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "addons.seeds[].id cannot be empty".to_string(),
            ));
        }
        if !seen.insert(seed.id.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate addon seed id: {}",
                seed.id
            )));
        }
        let url = seed.url.trim();
        if !SEED_URL_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
            return Err(ConfigError::ValidationError(format!(
                "addon seed '{}' has an unsupported url: {}",
                seed.id, seed.url
            )));
        }
    }

    Ok(())
}
