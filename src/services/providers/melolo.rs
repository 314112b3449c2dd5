//! Melolo
//!
//! Search results are grouped; each group carries its own `books` array.
//! Chapter ids double as stream ids for the resolution endpoint.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::fields::{array_at, number, text, text_at};
use super::{encode, ep_label, ProviderApi, StreamTarget, Upstream};
use crate::models::{Episode, Listing, Playlist};

pub struct Melolo;

fn book_listing(book: &Value) -> Option<Listing> {
    Some(Listing::new(
        text(book, "book_id")?,
        text(book, "book_name").unwrap_or_default(),
        text(book, "thumb_url").unwrap_or_default(),
        "Melolo",
    ))
}

/// Numeric chapter id, which is also the stream `videoId`; position otherwise
fn chapter_number(chapter: &Value, position: u64) -> u64 {
    if let Some(n) = number(chapter, "chapter_id").or_else(|| number(chapter, "id")) {
        return n;
    }
    if let Some(raw_id) = text(chapter, "chapter_id").or_else(|| text(chapter, "id")) {
        debug!(
            chapter_id = %raw_id,
            position,
            "Non-numeric melolo chapter id, using position as video id"
        );
    }
    position
}

/// Upstream hands out plain-http media URLs; browsers block them as mixed content
fn upgrade_scheme(url: String) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => url,
    }
}

#[async_trait]
impl ProviderApi for Melolo {
    fn default_title(&self) -> &'static str {
        "Melolo"
    }

    fn home_paths(&self) -> &'static [&'static str] {
        &["/melolo/trending", "/melolo/latest"]
    }

    fn search_path(&self, query: &str) -> String {
        format!("/melolo/search?query={}&limit=10", encode(query))
    }

    fn detail_path(&self, id: &str) -> String {
        format!("/melolo/detail?book_id={}", encode(id))
    }

    fn extract_listings(&self, raw: &Value, is_search: bool) -> Vec<Listing> {
        if is_search {
            array_at(raw, &["data", "search_data"])
                .iter()
                .flat_map(|group| array_at(group, &["books"]))
                .filter_map(book_listing)
                .collect()
        } else {
            array_at(raw, &["books"])
                .iter()
                .filter_map(book_listing)
                .collect()
        }
    }

    fn extract_playlist(&self, id: &str, raw: &Value) -> Playlist {
        let mut chapters = array_at(raw, &["chapter_list"]);
        if chapters.is_empty() {
            chapters = array_at(raw, &["catalog"]);
        }

        let episodes = chapters
            .iter()
            .enumerate()
            .map(|(index, chapter)| {
                let position = index as u64 + 1;
                Episode {
                    id: id.to_string(),
                    title: text(chapter, "title").unwrap_or_else(|| ep_label(position)),
                    episode: chapter_number(chapter, position),
                    season: 1,
                    direct_url: String::new(),
                }
            })
            .collect();

        Playlist {
            title: text(raw, "book_name").unwrap_or_else(|| self.default_title().to_string()),
            episodes,
        }
    }

    async fn resolve_stream(&self, upstream: &Upstream<'_>, target: StreamTarget<'_>) -> Option<String> {
        let stream = upstream
            .get(&format!("/melolo/stream?videoId={}", target.episode))
            .await?;

        text_at(&stream, &["data", "main_url"]).map(upgrade_scheme)
    }
}
