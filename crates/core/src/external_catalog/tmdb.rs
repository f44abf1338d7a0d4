//! TMDB (The Movie Database) API client.
//!
//! TMDB requires an API key for access. The key may come from config or be
//! supplied per request by the frontend.
//! Rate limits are generous (around 40 requests per second).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::{CatalogItem, Trailer};
use crate::metrics::EXTERNAL_SERVICE_REQUESTS;

use super::types::{TmdbCategory, TmdbMediaType};
use super::{ExternalCatalog, ExternalCatalogError};

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// TMDB API client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB API key. May be empty when every request supplies its own.
    #[serde(default)]
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Image base URL for posters/backdrops.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<String>,
}

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    image_base_url: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, ExternalCatalogError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let image_base_url = config
            .image_base_url
            .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string());

        let api_key = Some(config.api_key.trim().to_string()).filter(|k| !k.is_empty());

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Whether a key is configured (requests may still pass their own).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn resolve_key<'a>(&'a self, api_key: Option<&'a str>) -> Result<&'a str, ExternalCatalogError> {
        api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or(self.api_key.as_deref())
            .ok_or_else(|| {
                ExternalCatalogError::NotConfigured("TMDB API key is required".to_string())
            })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        params: &[(&str, &str)],
        api_key: Option<&str>,
    ) -> Result<T, ExternalCatalogError> {
        let api_key = self.resolve_key(api_key)?;
        let url = format!("{}{}", self.base_url, path);

        debug!(operation = operation, path = path, "TMDB request");

        let result = self.send(&url, params, api_key).await;
        let status = if result.is_ok() { "success" } else { "error" };
        EXTERNAL_SERVICE_REQUESTS
            .with_label_values(&["tmdb", operation, status])
            .inc();
        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
        api_key: &str,
    ) -> Result<T, ExternalCatalogError> {
        let response = self
            .client
            .get(url)
            .query(&[("api_key", api_key)])
            .query(params)
            .send()
            .await
            .map_err(|e| ExternalCatalogError::HttpError(e.without_url()))?;

        let status = response.status();
        if status == 401 {
            return Err(ExternalCatalogError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == 404 {
            return Err(ExternalCatalogError::NotFound(url.to_string()));
        }
        if status == 429 {
            return Err(ExternalCatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalCatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        // reqwest errors print the request URL, which carries the key.
        response.json().await.map_err(|e| {
            ExternalCatalogError::ParseError(format!(
                "Failed to parse TMDB response: {}",
                e.without_url()
            ))
        })
    }

    fn image(&self, size: &str, path: Option<String>) -> Option<String> {
        path.filter(|p| !p.is_empty())
            .map(|p| format!("{}/{}{}", self.image_base_url, size, p))
    }

    fn summary_item(&self, media: TmdbMediaType, r: TmdbListResult) -> Option<CatalogItem> {
        let name = r.title.or(r.name).filter(|n| !n.trim().is_empty())?;
        let date = r.release_date.or(r.first_air_date);

        let mut item = CatalogItem::new(format!("tmdb:{}", r.id), media.content_type(), name);
        item.poster = self.image("w500", r.poster_path);
        item.background = self.image("original", r.backdrop_path);
        item.description = r.overview.filter(|o| !o.is_empty());
        item.year = year_of(date.as_deref());
        item.release_info = item.year.map(|y| y.to_string());
        item.imdb_rating = r.vote_average.filter(|v| *v > 0.0);
        Some(item)
    }

    fn details_item(&self, media: TmdbMediaType, d: TmdbDetails) -> CatalogItem {
        let imdb_id = d
            .imdb_id
            .or(d.external_ids.and_then(|e| e.imdb_id))
            .filter(|id| !id.is_empty());
        let id = imdb_id.unwrap_or_else(|| format!("tmdb:{}", d.id));
        let name = d.title.or(d.name).unwrap_or_else(|| id.clone());
        let date = d.release_date.or(d.first_air_date);
        let runtime = d.runtime.or_else(|| d.episode_run_time.first().copied());

        let mut item = CatalogItem::new(id, media.content_type(), name);
        item.poster = self.image("w500", d.poster_path);
        item.background = self.image("original", d.backdrop_path);
        item.description = d.overview.filter(|o| !o.is_empty());
        item.year = year_of(date.as_deref());
        item.release_info = item.year.map(|y| y.to_string());
        item.imdb_rating = d.vote_average.filter(|v| *v > 0.0);
        item.genres = d.genres.into_iter().map(|g| g.name).collect();
        item.runtime = runtime.filter(|r| *r > 0).map(|r| format!("{} min", r));
        if let Some(credits) = d.credits {
            item.cast = credits.cast.into_iter().take(10).map(|c| c.name).collect();
            item.director = credits
                .crew
                .into_iter()
                .filter(|c| c.job.as_deref() == Some("Director"))
                .map(|c| c.name)
                .collect();
        }
        if let Some(videos) = d.videos {
            item.trailers = videos
                .results
                .into_iter()
                .filter(|v| v.site == "YouTube" && v.kind == "Trailer")
                .map(|v| Trailer {
                    source: v.key,
                    kind: Some("Trailer".to_string()),
                })
                .collect();
        }
        item
    }
}

#[async_trait]
impl ExternalCatalog for TmdbClient {
    async fn discover(
        &self,
        content_type: &str,
        category: TmdbCategory,
        page: u32,
        api_key: Option<&str>,
    ) -> Result<Vec<CatalogItem>, ExternalCatalogError> {
        let media = TmdbMediaType::from_content_type(content_type)?;
        let path = match category {
            TmdbCategory::Trending => format!("/trending/{}/week", media.path()),
            other => format!("/{}/{}", media.path(), other.as_str()),
        };
        let page = page.max(1).to_string();

        debug!("TMDB discover: type={}, category={}, page={}", content_type, category, page);

        let response: TmdbPage = self
            .get("discover", &path, &[("page", page.as_str())], api_key)
            .await?;

        Ok(response
            .results
            .into_iter()
            .filter_map(|r| self.summary_item(media, r))
            .collect())
    }

    async fn search(
        &self,
        content_type: &str,
        query: &str,
        api_key: Option<&str>,
    ) -> Result<Vec<CatalogItem>, ExternalCatalogError> {
        let media = TmdbMediaType::from_content_type(content_type)?;
        let path = format!("/search/{}", media.path());

        debug!("TMDB search: type={}, query='{}'", content_type, query);

        let response: TmdbPage = self
            .get("search", &path, &[("query", query)], api_key)
            .await?;

        Ok(response
            .results
            .into_iter()
            .filter_map(|r| self.summary_item(media, r))
            .collect())
    }

    async fn details(
        &self,
        content_type: &str,
        tmdb_id: u32,
        api_key: Option<&str>,
    ) -> Result<CatalogItem, ExternalCatalogError> {
        let media = TmdbMediaType::from_content_type(content_type)?;
        let path = format!("/{}/{}", media.path(), tmdb_id);

        debug!("TMDB details: type={}, id={}", content_type, tmdb_id);

        let details: TmdbDetails = self
            .get(
                "details",
                &path,
                &[("append_to_response", "credits,videos,external_ids")],
                api_key,
            )
            .await
            .map_err(|e| match e {
                ExternalCatalogError::NotFound(_) => {
                    ExternalCatalogError::NotFound(format!("{} {}", media.path(), tmdb_id))
                }
                other => other,
            })?;

        Ok(self.details_item(media, details))
    }
}

fn year_of(date: Option<&str>) -> Option<u32> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse().ok())
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbPage {
    #[serde(default)]
    results: Vec<TmdbListResult>,
}

/// Movie and TV list entries share one shape; movies use `title` and
/// `release_date`, TV uses `name` and `first_air_date`.
#[derive(Debug, Deserialize)]
struct TmdbListResult {
    id: u32,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct TmdbDetails {
    id: u32,
    title: Option<String>,
    name: Option<String>,
    imdb_id: Option<String>,
    external_ids: Option<TmdbExternalIds>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    episode_run_time: Vec<u32>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
    vote_average: Option<f32>,
    credits: Option<TmdbCredits>,
    videos: Option<TmdbVideos>,
}

#[derive(Debug, Deserialize)]
struct TmdbExternalIds {
    imdb_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TmdbCredits {
    #[serde(default)]
    cast: Vec<TmdbPerson>,
    #[serde(default)]
    crew: Vec<TmdbPerson>,
}

#[derive(Debug, Deserialize)]
struct TmdbPerson {
    name: String,
    job: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbVideos {
    #[serde(default)]
    results: Vec<TmdbVideo>,
}

#[derive(Debug, Deserialize)]
struct TmdbVideo {
    key: String,
    site: String,
    #[serde(rename = "type")]
    kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> TmdbClient {
        TmdbClient::new(TmdbConfig {
            api_key: "key".to_string(),
            base_url: None,
            image_base_url: Some("https://img.example/t/p/".to_string()),
        })
        .unwrap()
    }

    #[test]
    fn test_movie_result_conversion() {
        let result: TmdbListResult = serde_json::from_value(json!({
            "id": 603,
            "title": "The Matrix",
            "release_date": "1999-03-30",
            "overview": "A computer hacker...",
            "poster_path": "/poster.jpg",
            "vote_average": 8.2
        }))
        .unwrap();

        let item = client().summary_item(TmdbMediaType::Movie, result).unwrap();
        assert_eq!(item.id, "tmdb:603");
        assert_eq!(item.content_type, "movie");
        assert_eq!(item.year, Some(1999));
        assert_eq!(item.poster.as_deref(), Some("https://img.example/t/p/w500/poster.jpg"));
        assert!(item.background.is_none());
    }

    #[test]
    fn test_tv_result_uses_name() {
        let result: TmdbListResult = serde_json::from_value(json!({
            "id": 1396,
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20"
        }))
        .unwrap();

        let item = client().summary_item(TmdbMediaType::Tv, result).unwrap();
        assert_eq!(item.name, "Breaking Bad");
        assert_eq!(item.content_type, "series");
        assert_eq!(item.release_info.as_deref(), Some("2008"));
    }

    #[test]
    fn test_result_without_title_is_skipped() {
        let result: TmdbListResult = serde_json::from_value(json!({"id": 1})).unwrap();
        assert!(client().summary_item(TmdbMediaType::Movie, result).is_none());
    }

    #[test]
    fn test_details_conversion() {
        let details: TmdbDetails = serde_json::from_value(json!({
            "id": 1396,
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20",
            "episode_run_time": [47],
            "genres": [{"name": "Drama"}],
            "external_ids": {"imdb_id": "tt0903747"},
            "credits": {
                "cast": [{"name": "Bryan Cranston"}],
                "crew": [{"name": "Vince Gilligan", "job": "Director"}, {"name": "X", "job": "Writer"}]
            },
            "videos": {"results": [
                {"key": "abc", "site": "YouTube", "type": "Trailer"},
                {"key": "def", "site": "Vimeo", "type": "Trailer"}
            ]}
        }))
        .unwrap();

        let item = client().details_item(TmdbMediaType::Tv, details);
        assert_eq!(item.id, "tt0903747");
        assert_eq!(item.runtime.as_deref(), Some("47 min"));
        assert_eq!(item.genres, vec!["Drama"]);
        assert_eq!(item.director, vec!["Vince Gilligan"]);
        assert_eq!(item.trailers.len(), 1);
    }

    #[tokio::test]
    async fn test_connection_error_does_not_expose_api_key() {
        let client = TmdbClient::new(TmdbConfig {
            api_key: "SERVER_SECRET_KEY".to_string(),
            base_url: Some("http://127.0.0.1:1".to_string()),
            image_base_url: None,
        })
        .unwrap();

        let err = client
            .discover("movie", TmdbCategory::Popular, 1, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExternalCatalogError::HttpError(_)));
        assert!(!err.to_string().contains("SERVER_SECRET_KEY"));

        let err = client
            .search("movie", "matrix", Some("REQUEST_KEY"))
            .await
            .unwrap_err();
        assert!(!err.to_string().contains("REQUEST_KEY"));
    }

    #[tokio::test]
    async fn test_parse_error_does_not_expose_api_key() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = TmdbClient::new(TmdbConfig {
            api_key: "SERVER_SECRET_KEY".to_string(),
            base_url: Some(server.uri()),
            image_base_url: None,
        })
        .unwrap();

        let err = client
            .discover("movie", TmdbCategory::Popular, 1, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExternalCatalogError::ParseError(_)));
        assert!(!err.to_string().contains("SERVER_SECRET_KEY"));
    }

    #[test]
    fn test_resolve_key_prefers_override() {
        let client = client();
        assert_eq!(client.resolve_key(Some("other")).unwrap(), "other");
        assert_eq!(client.resolve_key(Some("  ")).unwrap(), "key");
        assert_eq!(client.resolve_key(None).unwrap(), "key");

        let keyless = TmdbClient::new(TmdbConfig::default()).unwrap();
        assert!(!keyless.has_api_key());
        assert!(matches!(
            keyless.resolve_key(None),
            Err(ExternalCatalogError::NotConfigured(_))
        ));
    }
}
