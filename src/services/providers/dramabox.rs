//! Dramabox
//!
//! Listings arrive either as a bare array or wrapped in `data`. Episodes carry
//! a CDN mirror list, each mirror with its own quality ladder.

use serde_json::Value;

use super::fields::{array_at, number, quality, root_or_array, text};
use super::{encode, ep_label, ProviderApi};
use crate::models::{Episode, Listing, Playlist};

pub struct Dramabox;

/// Title once the episode list has come back non-empty
const SERIES_TITLE: &str = "Dramabox Series";

/// Highest-quality variant of each mirror; the last mirror carrying a ladder
/// overwrites earlier ones.
// NOTE: earlier mirrors are discarded even when their top variant is better.
// Matches upstream client behavior; revisit once mirror preference is decided.
pub fn mirror_url(chapter: &Value) -> String {
    let mut video_url = String::new();

    for cdn in array_at(chapter, &["cdnList"]) {
        let Some(variants) = cdn.get("videoPathList").and_then(Value::as_array) else {
            continue;
        };

        let mut ladder: Vec<&Value> = variants.iter().collect();
        ladder.sort_by(|a, b| quality(b).total_cmp(&quality(a)));

        video_url = ladder
            .first()
            .and_then(|v| text(v, "videoPath"))
            .unwrap_or_default();
    }

    video_url
}

impl ProviderApi for Dramabox {
    fn default_title(&self) -> &'static str {
        "Drama Series"
    }

    fn home_paths(&self) -> &'static [&'static str] {
        &["/dramabox/trending", "/dramabox/latest", "/dramabox/foryou"]
    }

    fn search_path(&self, query: &str) -> String {
        format!("/dramabox/search?query={}", encode(query))
    }

    fn detail_path(&self, id: &str) -> String {
        format!("/dramabox/allepisode?bookId={}", encode(id))
    }

    fn extract_listings(&self, raw: &Value, _is_search: bool) -> Vec<Listing> {
        root_or_array(raw, "data")
            .iter()
            .filter_map(|item| {
                let id = text(item, "bookId")?;
                let cover = text(item, "cover")
                    .or_else(|| text(item, "coverWap"))
                    .unwrap_or_default();
                Some(Listing::new(
                    id,
                    text(item, "bookName").unwrap_or_default(),
                    cover,
                    "Dramabox",
                ))
            })
            .collect()
    }

    fn extract_playlist(&self, id: &str, raw: &Value) -> Playlist {
        let episodes: Vec<Episode> = root_or_array(raw, "data")
            .iter()
            .enumerate()
            .map(|(index, chapter)| {
                let position = index as u64 + 1;
                Episode {
                    id: id.to_string(),
                    title: text(chapter, "chapterName").unwrap_or_else(|| ep_label(position)),
                    episode: number(chapter, "chapterIndex").map_or(position, |i| i + 1),
                    season: 1,
                    direct_url: mirror_url(chapter),
                }
            })
            .collect();

        let title = if episodes.is_empty() {
            self.default_title()
        } else {
            SERIES_TITLE
        };

        Playlist {
            title: title.to_string(),
            episodes,
        }
    }
}
