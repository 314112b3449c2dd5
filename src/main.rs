mod config;
mod models;
mod routes;
mod services;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::{
    fetch::{build_client, HttpFetcher, JsonFetcher},
    resolver::StreamResolver,
};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub listing_fetcher: Arc<dyn JsonFetcher>,
    pub detail_fetcher: Arc<dyn JsonFetcher>,
    pub resolver: StreamResolver,
    pub start_time: Instant,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dramafeed_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();
    let port = config.port;

    tracing::info!("Starting Dramafeed Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app_env);
    tracing::info!("Upstream: {}", config.upstream_base_url);

    // One HTTP client; listings and details are cached for different lifetimes
    let client = build_client(&config)?;
    let listing_fetcher: Arc<dyn JsonFetcher> = Arc::new(HttpFetcher::new(
        client.clone(),
        config.listing_cache_ttl(),
        config.fetch_cache_max_entries,
    ));
    let detail_fetcher: Arc<dyn JsonFetcher> = Arc::new(HttpFetcher::new(
        client,
        config.detail_cache_ttl(),
        config.fetch_cache_max_entries,
    ));
    tracing::info!(
        "Response caches initialized (listings {}s, details {}s)",
        config.listing_cache_ttl_secs,
        config.detail_cache_ttl_secs
    );

    let resolver = StreamResolver::new(detail_fetcher.clone(), config.upstream_base_url.clone());

    // Build application state
    let state = Arc::new(AppState {
        config,
        listing_fetcher,
        detail_fetcher,
        resolver,
        start_time: Instant::now(),
    });

    // Build router
    let app = routes::router(state)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
