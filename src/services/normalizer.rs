use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use std::collections::HashSet;

use crate::models::Listing;
use crate::services::providers::Provider;

/// Merge raw responses into unique listings, in source-then-item order.
///
/// `None` entries (failed upstream calls) contribute nothing. The first
/// listing to claim an id wins; later ones are dropped.
pub fn merge_unique(provider: Provider, responses: &[Option<Value>], is_search: bool) -> Vec<Listing> {
    let api = provider.api();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut listings = Vec::new();
    let mut duplicates_skipped = 0usize;

    for raw in responses.iter().flatten() {
        for listing in api.extract_listings(raw, is_search) {
            if listing.id.is_empty() {
                continue;
            }
            if seen_ids.insert(listing.id.clone()) {
                listings.push(listing);
            } else {
                duplicates_skipped += 1;
            }
        }
    }

    tracing::debug!(
        provider = %provider,
        sources = responses.len(),
        failed = responses.iter().filter(|r| r.is_none()).count(),
        listings = listings.len(),
        duplicates_skipped,
        "Listings normalized"
    );

    listings
}

/// Normalize listings for display.
///
/// Search results keep their upstream relevance order. The home feed is
/// shuffled with `rng` so that each visit looks fresh.
pub fn normalize<R: Rng + ?Sized>(
    provider: Provider,
    responses: &[Option<Value>],
    is_search: bool,
    rng: &mut R,
) -> Vec<Listing> {
    let mut listings = merge_unique(provider, responses, is_search);
    if !is_search {
        listings.shuffle(rng);
    }
    listings
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn ids(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.id.as_str()).collect()
    }

    fn dramabox_page(ids: &[&str]) -> Option<Value> {
        Some(Value::Array(
            ids.iter()
                .map(|id| json!({"bookId": id, "bookName": format!("Title {}", id)}))
                .collect(),
        ))
    }

    #[test]
    fn test_null_responses_yield_nothing() {
        for provider in Provider::ALL {
            let mut rng = StdRng::seed_from_u64(1);
            assert!(normalize(provider, &[None, None], false, &mut rng).is_empty());
            assert!(normalize(provider, &[Some(Value::Null)], true, &mut rng).is_empty());
        }
    }

    #[test]
    fn test_cross_response_dedup_first_wins() {
        let responses = vec![
            Some(json!([{"bookId": "X42", "bookName": "First"}])),
            None,
            Some(json!({"data": [{"bookId": "X42", "bookName": "Second"}, {"bookId": "Y1"}]})),
        ];
        let listings = merge_unique(Provider::Dramabox, &responses, true);
        assert_eq!(ids(&listings), ["X42", "Y1"]);
        assert_eq!(listings[0].title, "First");
    }

    #[test]
    fn test_search_order_is_stable() {
        let responses = vec![dramabox_page(&["c", "a", "b"])];
        let mut rng = StdRng::seed_from_u64(7);
        let first = normalize(Provider::Dramabox, &responses, true, &mut rng);
        let second = normalize(Provider::Dramabox, &responses, true, &mut rng);
        assert_eq!(ids(&first), ["c", "a", "b"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_browse_is_permutation_of_unique_set() {
        let responses = vec![
            dramabox_page(&["1", "2", "3", "4"]),
            dramabox_page(&["3", "4", "5", "6", "7", "8"]),
        ];
        let mut rng = StdRng::seed_from_u64(42);
        let shuffled = normalize(Provider::Dramabox, &responses, false, &mut rng);

        let mut sorted = ids(&shuffled);
        sorted.sort_unstable();
        assert_eq!(sorted, ["1", "2", "3", "4", "5", "6", "7", "8"]);
    }

    #[test]
    fn test_browse_shuffle_follows_rng() {
        let responses = vec![dramabox_page(&["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"])];
        let a = normalize(Provider::Dramabox, &responses, false, &mut StdRng::seed_from_u64(3));
        let b = normalize(Provider::Dramabox, &responses, false, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_items_without_id_dropped() {
        let responses = vec![Some(json!({"contentInfos": [
            {"shortPlayName": "orphan"},
            {"shortPlayId": "", "shortPlayName": "blank"},
            {"shortPlayId": "n1", "shortPlayName": "kept"}
        ]}))];
        let listings = merge_unique(Provider::Netshort, &responses, false);
        assert_eq!(ids(&listings), ["n1"]);
    }

    #[test]
    fn test_wrong_shape_is_empty_not_error() {
        let responses = vec![
            Some(json!("unexpected string")),
            Some(json!({"subjectList": {"not": "an array"}})),
            Some(json!(17)),
        ];
        assert!(merge_unique(Provider::Moviebox, &responses, false).is_empty());
    }
}
