use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::services::fetch::JsonFetcher;
use crate::services::providers::{Provider, StreamTarget, Upstream};

/// Absolute http(s) URL that can be handed to the player as-is
pub fn is_playable_url(candidate: &str) -> bool {
    matches!(
        Url::parse(candidate.trim()),
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host()
    )
}

/// Lazy per-episode stream resolution
#[derive(Clone)]
pub struct StreamResolver {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
}

impl StreamResolver {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    /// Resolve a playable URL, or `""` when nothing playable can be found.
    ///
    /// A `known_url` that is already absolute is returned without touching
    /// the network.
    pub async fn resolve(
        &self,
        provider: Provider,
        id: &str,
        season: u32,
        episode: u64,
        known_url: &str,
    ) -> String {
        if is_playable_url(known_url) {
            return known_url.to_string();
        }

        let upstream = Upstream::new(self.fetcher.as_ref(), &self.base_url);
        let target = StreamTarget { id, season, episode };

        match provider.api().resolve_stream(&upstream, target).await {
            Some(url) if !url.is_empty() => {
                debug!(provider = %provider, id, season, episode, "Stream resolved");
                url
            }
            _ => {
                warn!(provider = %provider, id, season, episode, "Stream unresolvable");
                String::new()
            }
        }
    }
}
