use serde_json::Value;

use crate::models::Playlist;
use crate::services::providers::Provider;

/// Build the playlist for one title; an absent payload yields no episodes
pub fn build_playlist(provider: Provider, id: &str, raw: Option<&Value>) -> Playlist {
    let api = provider.api();
    let playlist = match raw {
        Some(raw) => api.extract_playlist(id, raw),
        None => Playlist::empty(api.default_title()),
    };

    tracing::debug!(
        provider = %provider,
        id,
        episodes = playlist.episodes.len(),
        "Playlist built"
    );

    playlist
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_payload_uses_provider_title() {
        assert_eq!(build_playlist(Provider::Melolo, "7001", None), Playlist::empty("Melolo"));
        assert_eq!(build_playlist(Provider::Dramabox, "41000", None).title, "Drama Series");

        for provider in Provider::ALL {
            let playlist = build_playlist(provider, "x", None);
            assert_eq!(playlist.title, provider.api().default_title());
            assert!(playlist.episodes.is_empty());
        }
    }

    #[test]
    fn test_wrong_shape_yields_no_episodes() {
        for provider in [Provider::Dramabox, Provider::Netshort, Provider::Flickreels, Provider::Melolo] {
            let playlist = build_playlist(provider, "x", Some(&json!({"unexpected": true})));
            assert!(playlist.episodes.is_empty(), "{}", provider);
        }
    }

    #[test]
    fn test_quality_pick_per_episode() {
        let raw = json!([{
            "chapterIndex": 0,
            "cdnList": [{"videoPathList": [
                {"quality": 480, "videoPath": "https://cdn/480.mp4"},
                {"quality": 1080, "videoPath": "https://cdn/1080.mp4"},
                {"quality": 720, "videoPath": "https://cdn/720.mp4"}
            ]}]
        }]);
        let playlist = build_playlist(Provider::Dramabox, "41000", Some(&raw));
        assert_eq!(playlist.title, "Dramabox Series");
        assert_eq!(playlist.episodes[0].direct_url, "https://cdn/1080.mp4");
    }

    #[test]
    fn test_fallback_titles_use_position() {
        let raw = json!({"chapter_list": [{"chapter_id": 10}, {"chapter_id": 11}, {"chapter_id": 12}]});
        let playlist = build_playlist(Provider::Melolo, "7001", Some(&raw));
        let titles: Vec<_> = playlist.episodes.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Ep 1", "Ep 2", "Ep 3"]);
    }

    #[test]
    fn test_episodes_share_parent_id() {
        let raw = json!({"subject": {"title": "Arcane", "subjectType": 2},
                         "resource": {"seasons": [{"se": 1, "maxEp": 2}]}});
        let playlist = build_playlist(Provider::Moviebox, "s1", Some(&raw));
        assert!(playlist.episodes.iter().all(|e| e.id == "s1"));
    }
}
