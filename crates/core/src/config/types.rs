use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::external_catalog::TmdbConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub addons: AddonsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub tmdb: Option<TmdbConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Addon transport configuration and the seed list loaded at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddonsConfig {
    /// Per-call timeout for manifest and resource requests (default: 10).
    #[serde(default = "default_addon_timeout")]
    pub timeout_secs: u64,
    /// Addons to load at startup.
    #[serde(default)]
    pub seeds: Vec<AddonSeed>,
}

impl Default for AddonsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_addon_timeout(),
            seeds: Vec::new(),
        }
    }
}

fn default_addon_timeout() -> u64 {
    10
}

/// A configured addon, identified before its manifest is known.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AddonSeed {
    /// Expected addon id (matches the manifest `id`).
    pub id: String,
    /// Transport URL (base URL or direct manifest URL).
    pub url: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Response cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Entry lifetime in seconds (default: 30 minutes).
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
        }
    }
}

fn default_ttl() -> u64 {
    30 * 60
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub addons: AddonsConfig,
    pub cache: CacheConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<SanitizedTmdbConfig>,
}

/// Sanitized TMDB config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub api_key_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            addons: config.addons.clone(),
            cache: config.cache.clone(),
            tmdb: config.tmdb.as_ref().map(|t| SanitizedTmdbConfig {
                api_key_configured: !t.api_key.is_empty(),
                base_url: t.base_url.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.addons.timeout_secs, 10);
        assert!(config.addons.seeds.is_empty());
        assert_eq!(config.cache.ttl_secs, 1800);
        assert!(config.tmdb.is_none());
    }

    #[test]
    fn test_deserialize_server_section() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_deserialize_addon_seeds() {
        let toml = r#"
[addons]
timeout_secs = 5

[[addons.seeds]]
id = "com.linvo.cinemeta"
url = "https://v3-cinemeta.strem.io"

[[addons.seeds]]
id = "org.opensubtitles"
url = "https://opensubtitles.strem.io/manifest.json"
enabled = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.addons.timeout_secs, 5);
        assert_eq!(config.addons.seeds.len(), 2);
        assert!(config.addons.seeds[0].enabled); // default
        assert!(!config.addons.seeds[1].enabled);
        assert_eq!(config.addons.seeds[1].id, "org.opensubtitles");
    }

    #[test]
    fn test_deserialize_cache_ttl() {
        let toml = r#"
[cache]
ttl_secs = 60
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cache.ttl_secs, 60);
    }

    #[test]
    fn test_seed_missing_url_fails() {
        let toml = r#"
[[addons.seeds]]
id = "broken"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_sanitized_config_hides_tmdb_key() {
        let config = Config {
            tmdb: Some(TmdbConfig {
                api_key: "secret-key".to_string(),
                base_url: None,
                image_base_url: None,
            }),
            ..Default::default()
        };

        let sanitized = SanitizedConfig::from(&config);
        let tmdb = sanitized.tmdb.as_ref().unwrap();
        assert!(tmdb.api_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-key"));
    }

    #[test]
    fn test_sanitized_config_without_tmdb() {
        let sanitized = SanitizedConfig::from(&Config::default());
        assert!(sanitized.tmdb.is_none());
        assert_eq!(sanitized.server.port, 8080);
    }
}
