//! Flickreels

use serde_json::Value;

use super::fields::{array_at, number, text, text_at};
use super::{encode, ep_label, ProviderApi};
use crate::models::{Episode, Listing, Playlist};

pub struct Flickreels;

impl ProviderApi for Flickreels {
    fn default_title(&self) -> &'static str {
        "Flickreels"
    }

    fn home_paths(&self) -> &'static [&'static str] {
        &["/flickreels/foryou", "/flickreels/latest"]
    }

    fn search_path(&self, query: &str) -> String {
        format!("/flickreels/search?query={}", encode(query))
    }

    fn detail_path(&self, id: &str) -> String {
        format!("/flickreels/detailAndAllEpisode?id={}", encode(id))
    }

    fn extract_listings(&self, raw: &Value, is_search: bool) -> Vec<Listing> {
        let path: &[&str] = if is_search { &["data"] } else { &["data", "list"] };

        array_at(raw, path)
            .iter()
            .filter_map(|item| {
                Some(Listing::new(
                    text(item, "playlet_id")?,
                    text(item, "title").unwrap_or_default(),
                    text(item, "cover").unwrap_or_default(),
                    "Flickreels",
                ))
            })
            .collect()
    }

    fn extract_playlist(&self, id: &str, raw: &Value) -> Playlist {
        let episodes = array_at(raw, &["episodes"])
            .iter()
            .enumerate()
            .map(|(position, ep)| {
                // `index` is zero-based upstream
                let episode = number(ep, "index").unwrap_or(position as u64) + 1;
                Episode {
                    id: id.to_string(),
                    title: text(ep, "name").unwrap_or_else(|| ep_label(episode)),
                    episode,
                    season: 1,
                    direct_url: text_at(ep, &["raw", "videoUrl"]).unwrap_or_default(),
                }
            })
            .collect();

        Playlist {
            title: text_at(raw, &["drama", "title"])
                .unwrap_or_else(|| self.default_title().to_string()),
            episodes,
        }
    }
}
