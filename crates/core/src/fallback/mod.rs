//! Deterministic mock data used when providers return nothing or fail.
//!
//! The shapes match the aggregator's output so handlers can swap one for the
//! other without reshaping.

mod dataset;

use dataset::{MockTitle, MOVIES, SERIES};

use crate::aggregator::{CatalogResponse, MetaResponse, StreamsResponse, SubtitlesResponse};
use crate::content::{CatalogItem, StreamDescriptor, Subtitle};

/// Addon id stamped on mock streams and subtitles.
pub const FALLBACK_ADDON_ID: &str = "streamhub.fallback";

const DEMO_STREAM_URL: &str =
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

/// Stateless source of fallback content.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackProvider;

impl FallbackProvider {
    pub fn new() -> Self {
        Self
    }

    /// Between 1 and `count` items of `content_type`. Each category starts
    /// the dataset at a fixed offset so different rows do not look identical.
    /// Types without a dataset of their own get the movie titles, labelled
    /// with the requested type.
    pub fn mock_catalog(&self, content_type: &str, category: &str, count: usize) -> CatalogResponse {
        let titles = titles_for(content_type);
        let offset = category_offset(category) % titles.len();
        let metas = titles
            .iter()
            .cycle()
            .skip(offset)
            .take(count.clamp(1, titles.len()))
            .map(|t| to_item(t, content_type_of(content_type)))
            .collect();

        CatalogResponse { metas }
    }

    /// Fixed record for a known id, `None` otherwise.
    pub fn mock_meta(&self, content_type: &str, id: &str) -> MetaResponse {
        let meta = titles_for(content_type)
            .iter()
            .find(|t| t.id == id)
            .map(|t| to_item(t, content_type_of(content_type)));
        MetaResponse { meta }
    }

    /// Case-insensitive title match, across movies and series unless
    /// `content_type` narrows it. When nothing matches, the first `count`
    /// candidates are returned instead, so the result is never empty.
    pub fn mock_search(
        &self,
        query: &str,
        content_type: Option<&str>,
        count: usize,
    ) -> CatalogResponse {
        let needle = query.trim().to_lowercase();
        let count = count.max(1);
        let candidates: Vec<(&MockTitle, &str)> = match content_type {
            Some(kind) => titles_for(kind)
                .iter()
                .map(|t| (t, content_type_of(kind)))
                .collect(),
            None => MOVIES
                .iter()
                .map(|t| (t, "movie"))
                .chain(SERIES.iter().map(|t| (t, "series")))
                .collect(),
        };

        let matches: Vec<CatalogItem> = candidates
            .iter()
            .filter(|(t, _)| !needle.is_empty() && t.name.to_lowercase().contains(&needle))
            .take(count)
            .map(|(t, kind)| to_item(t, kind))
            .collect();

        let metas = if matches.is_empty() {
            candidates
                .iter()
                .take(count)
                .map(|(t, kind)| to_item(t, kind))
                .collect()
        } else {
            matches
        };
        CatalogResponse { metas }
    }

    /// A single demo stream.
    pub fn mock_streams(&self, content_type: &str, id: &str) -> StreamsResponse {
        let label = self
            .mock_meta(content_type, id)
            .meta
            .map(|m| m.name)
            .unwrap_or_else(|| id.to_string());

        StreamsResponse {
            streams: vec![StreamDescriptor {
                name: Some("Demo".to_string()),
                title: Some(format!("{} (demo stream)", label)),
                url: DEMO_STREAM_URL.to_string(),
                addon_id: Some(FALLBACK_ADDON_ID.to_string()),
            }],
        }
    }

    /// A single English demo subtitle track.
    pub fn mock_subtitles(&self, _content_type: &str, id: &str) -> SubtitlesResponse {
        SubtitlesResponse {
            subtitles: vec![Subtitle {
                id: format!("{}-eng", id),
                url: format!("https://example.com/subtitles/{}/eng.vtt", id),
                lang: "eng".to_string(),
                addon_id: Some(FALLBACK_ADDON_ID.to_string()),
            }],
        }
    }
}

fn titles_for(content_type: &str) -> &'static [MockTitle] {
    match content_type {
        "series" | "tv" => SERIES,
        _ => MOVIES,
    }
}

fn content_type_of(content_type: &str) -> &str {
    match content_type {
        "tv" => "series",
        other => other,
    }
}

fn category_offset(category: &str) -> usize {
    match category {
        "top" | "top_rated" => 0,
        "popular" => 3,
        "trending" => 5,
        "new" | "latest" => 7,
        other => other.bytes().map(usize::from).sum(),
    }
}

fn to_item(title: &MockTitle, content_type: &str) -> CatalogItem {
    let mut item = CatalogItem::new(title.id, content_type, title.name);
    item.poster = Some(format!(
        "https://images.metahub.space/poster/medium/{}/img",
        title.id
    ));
    item.background = Some(format!(
        "https://images.metahub.space/background/medium/{}/img",
        title.id
    ));
    item.description = Some(title.description.to_string());
    item.release_info = Some(title.year.to_string());
    item.year = Some(title.year);
    item.imdb_rating = Some(title.rating);
    item.runtime = Some(title.runtime.to_string());
    item.genres = title.genres.iter().map(|g| g.to_string()).collect();
    item.director = title.director.iter().map(|d| d.to_string()).collect();
    item.cast = title.cast.iter().map(|c| c.to_string()).collect();
    item
}
