use serde::{Deserialize, Serialize};

use crate::services::providers::Provider;

/// Discovery-grid entry, uniform across providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub cover: String,
    pub label: String,
}

impl Listing {
    /// Build a listing, rewriting `.heic` covers to `.jpg`
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        cover: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            cover: jpeg_cover(cover.into()),
            label: label.into(),
        }
    }
}

/// Upstream CDN does not reliably serve `.heic` to browsers; the `.jpg`
/// rendition lives at the same path.
pub fn jpeg_cover(cover: String) -> String {
    if cover.contains(".heic") {
        cover.replacen(".heic", ".jpg", 1)
    } else {
        cover
    }
}

/// One playable unit of a title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    /// Parent title identifier, shared by every episode of the title
    pub id: String,
    pub title: String,
    pub episode: u64,
    pub season: u32,
    /// Empty when the stream has to be resolved on demand
    pub direct_url: String,
}

/// Ordered episodes of one title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub title: String,
    pub episodes: Vec<Episode>,
}

impl Playlist {
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            episodes: Vec::new(),
        }
    }
}

/// Query parameters for the listings endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListingsQuery {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

/// Query parameters for the stream endpoint
#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    #[serde(default = "default_ordinal")]
    pub season: u32,
    #[serde(default = "default_ordinal_u64")]
    pub episode: u64,
    #[serde(default)]
    pub url: Option<String>,
}

fn default_ordinal() -> u32 {
    1
}

fn default_ordinal_u64() -> u64 {
    1
}

/// Listings response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingsResponse {
    pub provider: Provider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub total: usize,
    pub items: Vec<Listing>,
}

/// Playlist response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResponse {
    pub provider: Provider,
    pub id: String,
    pub title: String,
    pub total: usize,
    pub episodes: Vec<Episode>,
}

/// Stream resolution response; an empty `url` means unresolvable
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamResponse {
    pub url: String,
    pub resolved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heic_cover_rewritten() {
        let listing = Listing::new("1", "t", "https://img.example/a/cover.heic", "Melolo");
        assert_eq!(listing.cover, "https://img.example/a/cover.jpg");
    }

    #[test]
    fn test_heic_with_query_string() {
        assert_eq!(
            jpeg_cover("https://img.example/x~tplv.heic?sig=abc".to_string()),
            "https://img.example/x~tplv.jpg?sig=abc"
        );
    }

    #[test]
    fn test_non_heic_cover_unchanged() {
        let listing = Listing::new("1", "t", "https://img.example/cover.webp", "Dramabox");
        assert_eq!(listing.cover, "https://img.example/cover.webp");
    }

    #[test]
    fn test_episode_serializes_camel_case() {
        let ep = Episode {
            id: "b1".to_string(),
            title: "Ep 1".to_string(),
            episode: 1,
            season: 1,
            direct_url: String::new(),
        };
        let json = serde_json::to_value(&ep).unwrap();
        assert_eq!(json["directUrl"], "");
        assert_eq!(json["episode"], 1);
    }
}
