//! Moviebox
//!
//! Detail payloads describe seasons by episode count only, so the playlist is
//! synthesized. Streams are never embedded; they come from a separate sources
//! endpoint whose cloud-storage entries need one more hop to become playable.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::fields::{array_at, number, text, text_at};
use super::{encode, ProviderApi, StreamTarget, Upstream};
use crate::models::{Episode, Listing, Playlist};

/// Subject type for single-unit content
const SUBJECT_MOVIE: u64 = 1;

pub struct Moviebox;

/// Hosts whose sharing links are not directly streamable
fn is_cloud_storage(url: &str) -> bool {
    url.contains("google") || url.contains("gdrive")
}

/// `"IMDB {rating}"` unless the rating is missing, empty or numeric zero
fn rating_label(item: &Value) -> String {
    let rated = match item.get("imdbRatingValue") {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    };

    match text(item, "imdbRatingValue") {
        Some(rating) if rated => format!("IMDB {}", rating),
        _ => "Movie".to_string(),
    }
}

fn single_episode(id: &str, title: &str) -> Vec<Episode> {
    vec![Episode {
        id: id.to_string(),
        title: title.to_string(),
        episode: 1,
        season: 1,
        direct_url: String::new(),
    }]
}

#[async_trait]
impl ProviderApi for Moviebox {
    fn default_title(&self) -> &'static str {
        "Moviebox"
    }

    fn home_paths(&self) -> &'static [&'static str] {
        &["/moviebox/trending", "/moviebox/homepage"]
    }

    fn search_path(&self, query: &str) -> String {
        format!("/moviebox/search?query={}&page=1", encode(query))
    }

    fn detail_path(&self, id: &str) -> String {
        format!("/moviebox/detail?subjectId={}", encode(id))
    }

    fn extract_listings(&self, raw: &Value, is_search: bool) -> Vec<Listing> {
        let key = if is_search { "items" } else { "subjectList" };

        array_at(raw, &[key])
            .iter()
            .filter_map(|item| {
                Some(Listing::new(
                    text(item, "subjectId")?,
                    text(item, "title").unwrap_or_default(),
                    text_at(item, &["cover", "url"]).unwrap_or_default(),
                    rating_label(item),
                ))
            })
            .collect()
    }

    fn extract_playlist(&self, id: &str, raw: &Value) -> Playlist {
        let title = text_at(raw, &["subject", "title"])
            .unwrap_or_else(|| self.default_title().to_string());
        let subject_type = raw
            .get("subject")
            .and_then(|s| number(s, "subjectType"))
            .filter(|t| *t != 0)
            .unwrap_or(SUBJECT_MOVIE);

        let seasons = array_at(raw, &["resource", "seasons"]);
        let episodes = if subject_type == SUBJECT_MOVIE || seasons.is_empty() {
            single_episode(id, &title)
        } else {
            seasons
                .iter()
                .enumerate()
                .flat_map(|(position, s)| {
                    let season = number(s, "se").map_or(position as u32 + 1, |se| se as u32);
                    let max_ep = number(s, "maxEp").filter(|n| *n > 0).unwrap_or(1);
                    (1..=max_ep).map(move |episode| Episode {
                        id: id.to_string(),
                        title: format!("S{} E{}", season, episode),
                        episode,
                        season,
                        direct_url: String::new(),
                    })
                })
                .collect()
        };

        Playlist { title, episodes }
    }

    async fn resolve_stream(&self, upstream: &Upstream<'_>, target: StreamTarget<'_>) -> Option<String> {
        // Sources are per subject; season and episode do not narrow them upstream
        debug!(
            id = target.id,
            season = target.season,
            episode = target.episode,
            "Fetching moviebox sources"
        );
        let sources = upstream
            .get(&format!("/moviebox/sources?subjectId={}", encode(target.id)))
            .await?;

        for download in array_at(&sources, &["downloads"]) {
            let Some(url) = text(download, "url") else {
                continue;
            };

            if !is_cloud_storage(&url) {
                return Some(url);
            }

            let generate = format!("/moviebox/generate-link-stream-video?url={}", encode(&url));
            match upstream.get(&generate).await.and_then(|g| text(&g, "streamUrl")) {
                Some(stream_url) => return Some(stream_url),
                None => debug!("Stream link generation failed for {}, trying next source", url),
            }
        }

        array_at(&sources, &["processedSources"])
            .first()
            .and_then(|s| text(s, "directUrl"))
    }
}
