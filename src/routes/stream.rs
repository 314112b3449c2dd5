use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::models::{StreamQuery, StreamResponse};
use crate::AppState;

use super::{parse_provider, require_id};

/// GET /api/stream/:provider/:id?season=&episode=&url=
///
/// An unresolvable stream is not an error: the response carries an empty
/// `url` and `resolved: false`, and the player offers a retry.
pub async fn resolve_stream(
    State(state): State<Arc<AppState>>,
    Path((provider, id)): Path<(String, String)>,
    Query(query): Query<StreamQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let provider = parse_provider(&provider)?;
    let id = require_id(&id)?;

    let url = state
        .resolver
        .resolve(
            provider,
            id,
            query.season,
            query.episode,
            query.url.as_deref().unwrap_or_default(),
        )
        .await;

    Ok(Json(StreamResponse {
        resolved: !url.is_empty(),
        url,
    }))
}
