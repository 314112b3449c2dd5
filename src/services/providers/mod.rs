//! Upstream Provider Integrations
//!
//! Each supported drama service has its own response schema. This module maps
//! a closed set of provider identifiers onto one implementation each of
//! [`ProviderApi`], which covers:
//!
//! - **Endpoints**: home feed, search and episode-list paths
//! - **Listings**: raw browse/search payload into [`Listing`]s
//! - **Playlists**: raw episode payload into a [`Playlist`]
//! - **Streams**: lazy resolution of a playable URL where the playlist has none
//!
//! All paths are relative to the configured upstream base URL, e.g.
//! ```text
//! https://api.sansekai.my.id/api + /dramabox/trending
//! ```

pub mod dramabox;
pub mod fields;
pub mod flickreels;
pub mod melolo;
pub mod moviebox;
pub mod netshort;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::models::{Listing, Playlist};
use crate::services::fetch::JsonFetcher;

/// Supported upstream services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Dramabox,
    Netshort,
    Flickreels,
    Moviebox,
    Melolo,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::Dramabox,
        Provider::Netshort,
        Provider::Flickreels,
        Provider::Moviebox,
        Provider::Melolo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Dramabox => "dramabox",
            Provider::Netshort => "netshort",
            Provider::Flickreels => "flickreels",
            Provider::Moviebox => "moviebox",
            Provider::Melolo => "melolo",
        }
    }

    /// Schema and endpoint implementation for this provider
    pub fn api(self) -> &'static dyn ProviderApi {
        match self {
            Provider::Dramabox => &dramabox::Dramabox,
            Provider::Netshort => &netshort::Netshort,
            Provider::Flickreels => &flickreels::Flickreels,
            Provider::Moviebox => &moviebox::Moviebox,
            Provider::Melolo => &melolo::Melolo,
        }
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::Dramabox
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}

/// Episode reference handed to stream resolution
#[derive(Debug, Clone, Copy)]
pub struct StreamTarget<'a> {
    pub id: &'a str,
    pub season: u32,
    pub episode: u64,
}

/// Fetcher bound to the upstream base URL
pub struct Upstream<'a> {
    fetcher: &'a dyn JsonFetcher,
    base_url: &'a str,
}

impl<'a> Upstream<'a> {
    pub fn new(fetcher: &'a dyn JsonFetcher, base_url: &'a str) -> Self {
        Self { fetcher, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Option<Value> {
        self.fetcher.fetch_json(&self.url(path)).await
    }
}

/// Per-provider capability set
#[async_trait]
pub trait ProviderApi: Send + Sync {
    /// Playlist title used when upstream supplies none
    fn default_title(&self) -> &'static str;

    /// Browse endpoints merged into the home feed
    fn home_paths(&self) -> &'static [&'static str];

    /// Search endpoint for an already-trimmed query
    fn search_path(&self, query: &str) -> String;

    /// Episode-list endpoint for one title
    fn detail_path(&self, id: &str) -> String;

    /// Map one raw browse/search response into listings, in source order
    fn extract_listings(&self, raw: &Value, is_search: bool) -> Vec<Listing>;

    /// Map a raw episode-list response into a playlist
    fn extract_playlist(&self, id: &str, raw: &Value) -> Playlist;

    /// Resolve a playable URL for an episode without one. `None` when the
    /// provider has no resolution path or every path failed.
    async fn resolve_stream(&self, _upstream: &Upstream<'_>, _target: StreamTarget<'_>) -> Option<String> {
        None
    }
}

/// `"Ep {n}"` fallback label
pub(crate) fn ep_label(n: u64) -> String {
    format!("Ep {}", n)
}

/// URL-encode a search term for interpolation into a query string
pub(crate) fn encode(term: &str) -> String {
    urlencoding::encode(term).into_owned()
}
