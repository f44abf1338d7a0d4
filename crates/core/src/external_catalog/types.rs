//! Request vocabulary shared by external catalog clients.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ExternalCatalogError;

/// Curated TMDB lists exposed through discover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TmdbCategory {
    Popular,
    TopRated,
    Trending,
}

impl TmdbCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TmdbCategory::Popular => "popular",
            TmdbCategory::TopRated => "top_rated",
            TmdbCategory::Trending => "trending",
        }
    }
}

impl fmt::Display for TmdbCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TmdbCategory {
    type Err = ExternalCatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "popular" => Ok(TmdbCategory::Popular),
            "top_rated" | "toprated" | "top" => Ok(TmdbCategory::TopRated),
            "trending" => Ok(TmdbCategory::Trending),
            other => Err(ExternalCatalogError::InvalidRequest(format!(
                "unknown category '{}'",
                other
            ))),
        }
    }
}

/// TMDB's split between films and television.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TmdbMediaType {
    Movie,
    Tv,
}

impl TmdbMediaType {
    /// Map a Stremio content type (`movie`, `series`) onto TMDB's.
    pub fn from_content_type(content_type: &str) -> Result<Self, ExternalCatalogError> {
        match content_type {
            "movie" => Ok(TmdbMediaType::Movie),
            "series" | "tv" => Ok(TmdbMediaType::Tv),
            other => Err(ExternalCatalogError::InvalidRequest(format!(
                "unsupported content type '{}'",
                other
            ))),
        }
    }

    /// Path segment used by the TMDB API.
    pub fn path(&self) -> &'static str {
        match self {
            TmdbMediaType::Movie => "movie",
            TmdbMediaType::Tv => "tv",
        }
    }

    /// Content type used in produced catalog items.
    pub fn content_type(&self) -> &'static str {
        match self {
            TmdbMediaType::Movie => "movie",
            TmdbMediaType::Tv => "series",
        }
    }
}

/// Parse a TMDB id given either bare (`603`) or prefixed (`tmdb:603`).
pub fn parse_tmdb_id(raw: &str) -> Result<u32, ExternalCatalogError> {
    raw.trim()
        .trim_start_matches("tmdb:")
        .parse()
        .map_err(|_| ExternalCatalogError::InvalidRequest(format!("invalid TMDB id '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!("popular".parse::<TmdbCategory>().unwrap(), TmdbCategory::Popular);
        assert_eq!("top-rated".parse::<TmdbCategory>().unwrap(), TmdbCategory::TopRated);
        assert_eq!("Trending".parse::<TmdbCategory>().unwrap(), TmdbCategory::Trending);
        assert!("newest".parse::<TmdbCategory>().is_err());
    }

    #[test]
    fn test_media_type_mapping() {
        assert_eq!(TmdbMediaType::from_content_type("series").unwrap().path(), "tv");
        assert_eq!(TmdbMediaType::Tv.content_type(), "series");
        assert!(TmdbMediaType::from_content_type("channel").is_err());
    }

    #[test]
    fn test_parse_tmdb_id() {
        assert_eq!(parse_tmdb_id("603").unwrap(), 603);
        assert_eq!(parse_tmdb_id("tmdb:1396").unwrap(), 1396);
        assert!(parse_tmdb_id("tt0133093").is_err());
    }
}
