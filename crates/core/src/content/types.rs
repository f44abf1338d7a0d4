//! Provider-neutral content records produced by addons, TMDB and the fallback dataset.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Extra query parameters for catalog/subtitles requests (`genre`, `skip`,
/// `search`, ...). Sorted by key so equal parameter sets compare equal.
pub type ExtraParams = BTreeMap<String, String>;

/// A trailer reference attached to a meta record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trailer {
    /// Provider-specific source (YouTube id for Stremio addons).
    pub source: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A catalog/meta record.
///
/// `id` is the identity key across merges (usually an IMDB id such as
/// `tt0111161`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_info: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_f32",
        skip_serializing_if = "Option::is_none"
    )]
    pub imdb_rating: Option<f32>,
    #[serde(default, deserialize_with = "string_or_seq")]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(default, deserialize_with = "string_or_seq")]
    pub cast: Vec<String>,
    #[serde(default, deserialize_with = "string_or_seq")]
    pub director: Vec<String>,
    #[serde(default)]
    pub trailers: Vec<Trailer>,
}

impl CatalogItem {
    /// Create a minimal record with only the required fields.
    pub fn new(
        id: impl Into<String>,
        content_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            content_type: content_type.into(),
            name: name.into(),
            poster: None,
            background: None,
            description: None,
            release_info: None,
            year: None,
            imdb_rating: None,
            genres: Vec::new(),
            runtime: None,
            cast: Vec::new(),
            director: Vec::new(),
            trailers: Vec::new(),
        }
    }

    /// Parse a provider payload, returning `None` when required fields are
    /// missing or empty.
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        let item: CatalogItem = serde_json::from_value(value).ok()?;
        if item.id.trim().is_empty() || item.name.trim().is_empty() {
            return None;
        }
        Some(item)
    }

    /// Year from `year`, falling back to the leading digits of `release_info`.
    pub fn effective_year(&self) -> Option<u32> {
        self.year.or_else(|| {
            self.release_info
                .as_deref()
                .and_then(|r| r.get(..4))
                .and_then(|y| y.parse().ok())
        })
    }
}

/// A playable source for a content item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreamDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
    /// Addon that offered this stream (filled in by the aggregator).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addon_id: Option<String>,
}

/// A subtitle track for a content item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subtitle {
    pub id: String,
    pub url: String,
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addon_id: Option<String>,
}

// ============================================================================
// Lenient field parsers (addons disagree on scalar vs string encodings)
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(u64),
    Float(f64),
    Text(String),
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<NumberOrString> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrString::Int(n)) => u32::try_from(n).ok(),
        Some(NumberOrString::Float(f)) if f >= 0.0 => Some(f as u32),
        Some(NumberOrString::Text(s)) => s.get(..4).and_then(|y| y.parse().ok()),
        _ => None,
    })
}

fn lenient_f32<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<NumberOrString> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrString::Int(n)) => Some(n as f32),
        Some(NumberOrString::Float(f)) => Some(f as f32),
        Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrSeq {
    One(String),
    Many(Vec<String>),
}

fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<StringOrSeq> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(StringOrSeq::One(s)) if !s.is_empty() => vec![s],
        Some(StringOrSeq::Many(v)) => v,
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_cinemeta_style_meta() {
        let item = CatalogItem::from_value(json!({
            "id": "tt0111161",
            "type": "movie",
            "name": "The Shawshank Redemption",
            "releaseInfo": "1994",
            "imdbRating": "9.3",
            "genres": ["Drama"],
            "director": "Frank Darabont",
            "trailers": [{"source": "6hB3S9bIaco", "type": "Trailer"}]
        }))
        .unwrap();

        assert_eq!(item.content_type, "movie");
        assert_eq!(item.imdb_rating, Some(9.3));
        assert_eq!(item.director, vec!["Frank Darabont"]);
        assert_eq!(item.effective_year(), Some(1994));
        assert_eq!(item.trailers[0].source, "6hB3S9bIaco");
    }

    #[test]
    fn test_year_accepts_number_or_string() {
        let a = CatalogItem::from_value(json!({"id": "a", "type": "movie", "name": "A", "year": 2001}))
            .unwrap();
        let b = CatalogItem::from_value(
            json!({"id": "b", "type": "series", "name": "B", "year": "2008-2013"}),
        )
        .unwrap();
        assert_eq!(a.year, Some(2001));
        assert_eq!(b.year, Some(2008));
    }

    #[test]
    fn test_missing_required_fields_rejected() {
        assert!(CatalogItem::from_value(json!({"type": "movie", "name": "No id"})).is_none());
        assert!(CatalogItem::from_value(json!({"id": "", "type": "movie", "name": "Empty"})).is_none());
        assert!(CatalogItem::from_value(json!({"id": "tt1", "type": "movie"})).is_none());
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut item = CatalogItem::new("tt1", "movie", "A");
        item.release_info = Some("1999".to_string());
        item.imdb_rating = Some(8.1);

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "movie");
        assert_eq!(value["releaseInfo"], "1999");
        assert!(value.get("poster").is_none());
    }

    #[test]
    fn test_stream_without_url_fails() {
        let result: Result<StreamDescriptor, _> =
            serde_json::from_value(json!({"name": "Torrentio", "infoHash": "abc"}));
        assert!(result.is_err());
    }
}
