//! Netshort
//!
//! Episode payloads carry a signed play voucher that is already a direct URL.

use serde_json::Value;

use super::fields::{array_at, number, text};
use super::{encode, ep_label, ProviderApi};
use crate::models::{Episode, Listing, Playlist};

pub struct Netshort;

impl ProviderApi for Netshort {
    fn default_title(&self) -> &'static str {
        "Netshort"
    }

    fn home_paths(&self) -> &'static [&'static str] {
        &["/netshort/foryou", "/netshort/theaters"]
    }

    fn search_path(&self, query: &str) -> String {
        format!("/netshort/search?query={}", encode(query))
    }

    fn detail_path(&self, id: &str) -> String {
        format!("/netshort/allepisode?shortPlayId={}", encode(id))
    }

    fn extract_listings(&self, raw: &Value, is_search: bool) -> Vec<Listing> {
        let key = if is_search {
            "searchCodeSearchResult"
        } else {
            "contentInfos"
        };

        array_at(raw, &[key])
            .iter()
            .filter_map(|item| {
                Some(Listing::new(
                    text(item, "shortPlayId")?,
                    text(item, "shortPlayName").unwrap_or_default(),
                    text(item, "shortPlayCover").unwrap_or_default(),
                    "Netshort",
                ))
            })
            .collect()
    }

    fn extract_playlist(&self, id: &str, raw: &Value) -> Playlist {
        let episodes = array_at(raw, &["shortPlayEpisodeInfos"])
            .iter()
            .enumerate()
            .map(|(index, info)| {
                let episode = number(info, "episodeNo").unwrap_or(index as u64 + 1);
                Episode {
                    id: id.to_string(),
                    title: ep_label(episode),
                    episode,
                    season: 1,
                    direct_url: text(info, "playVoucher").unwrap_or_default(),
                }
            })
            .collect();

        Playlist {
            title: text(raw, "shortPlayName").unwrap_or_else(|| self.default_title().to_string()),
            episodes,
        }
    }
}
