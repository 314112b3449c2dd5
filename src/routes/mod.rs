pub mod catalog;
pub mod health;
pub mod stream;

use axum::{http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;

use crate::services::providers::Provider;
use crate::AppState;

/// All HTTP routes, without middleware
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health endpoints
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .route("/live", get(health::live))
        // Catalog endpoints
        .route("/api/providers", get(catalog::get_providers))
        .route("/api/listings", get(catalog::get_listings))
        .route("/api/playlist/:provider/:id", get(catalog::get_playlist))
        // Stream resolution
        .route("/api/stream/:provider/:id", get(stream::resolve_stream))
        .with_state(state)
}

fn bad_request(message: String) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
}

pub(crate) fn parse_provider(name: &str) -> Result<Provider, (StatusCode, Json<serde_json::Value>)> {
    name.parse::<Provider>().map_err(|e| {
        tracing::warn!("Rejected provider {:?}", name);
        bad_request(e.to_string())
    })
}

pub(crate) fn require_id(id: &str) -> Result<&str, (StatusCode, Json<serde_json::Value>)> {
    let id = id.trim();
    if id.is_empty() {
        return Err(bad_request("Missing content id".to_string()));
    }
    Ok(id)
}
