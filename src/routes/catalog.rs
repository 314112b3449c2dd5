use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;

use crate::models::{ListingsQuery, ListingsResponse, PlaylistResponse};
use crate::services::normalizer::normalize;
use crate::services::playlist::build_playlist;
use crate::services::providers::{Provider, Upstream};
use crate::AppState;

use super::{parse_provider, require_id};

/// GET /api/providers - Supported provider identifiers
pub async fn get_providers() -> impl IntoResponse {
    Json(serde_json::json!({
        "providers": Provider::ALL,
        "default": Provider::default(),
    }))
}

/// GET /api/listings?provider=&q= - Home feed or search results
///
/// Without `q` every home endpoint of the provider is fetched concurrently and
/// the merged feed is shuffled. With `q` a single search endpoint is fetched
/// and its order is kept.
pub async fn get_listings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingsQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let provider = match query.provider.as_deref() {
        Some(name) if !name.trim().is_empty() => parse_provider(name)?,
        _ => Provider::default(),
    };

    let search = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());

    let api = provider.api();
    let paths: Vec<String> = match search {
        Some(q) => vec![api.search_path(q)],
        None => api.home_paths().iter().map(|p| p.to_string()).collect(),
    };

    let upstream = Upstream::new(state.listing_fetcher.as_ref(), &state.config.upstream_base_url);
    let responses: Vec<Option<Value>> = join_all(paths.iter().map(|p| upstream.get(p))).await;

    let is_search = search.is_some();
    let items = normalize(provider, &responses, is_search, &mut rand::thread_rng());

    tracing::info!(
        provider = %provider,
        search = is_search,
        sources = responses.len(),
        items = items.len(),
        "Listings served"
    );

    Ok(Json(ListingsResponse {
        provider,
        query: search.map(str::to_string),
        total: items.len(),
        items,
    }))
}

/// GET /api/playlist/:provider/:id - Episodes of one title
pub async fn get_playlist(
    State(state): State<Arc<AppState>>,
    Path((provider, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let provider = parse_provider(&provider)?;
    let id = require_id(&id)?;

    let upstream = Upstream::new(state.detail_fetcher.as_ref(), &state.config.upstream_base_url);
    let raw = upstream.get(&provider.api().detail_path(id)).await;
    let playlist = build_playlist(provider, id, raw.as_ref());

    Ok(Json(PlaylistResponse {
        provider,
        id: id.to_string(),
        title: playlist.title,
        total: playlist.episodes.len(),
        episodes: playlist.episodes,
    }))
}
