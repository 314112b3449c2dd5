//! Upstream JSON fetch layer
//!
//! Every failure mode (transport, status, decode) collapses into `None` here so
//! that normalization code only ever sees a payload or its absence.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lazy_static::lazy_static;
use lru::LruCache;
use prometheus::{register_int_counter_vec, IntCounterVec};
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::Client;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

lazy_static! {
    static ref UPSTREAM_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "upstream_requests_total",
        "Upstream JSON fetches by outcome",
        &["outcome"]
    )
    .unwrap();
}

/// Source of raw upstream payloads
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Fetch and decode a JSON document; `None` on any failure
    async fn fetch_json(&self, url: &str) -> Option<Value>;

    /// Number of payloads currently held in the freshness cache
    fn cached_entries(&self) -> usize {
        0
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("HTTP error: {0}")]
    Http(u16),
    #[error("decode error: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("empty payload")]
    Empty,
}

impl FetchError {
    fn outcome(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network_error",
            FetchError::Http(_) => "http_error",
            FetchError::Decode(_) | FetchError::Empty => "decode_error",
        }
    }
}

/// Build the shared upstream client carrying the identity headers
pub fn build_client(config: &Config) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        REFERER,
        HeaderValue::from_str(&config.upstream_referer).context("Invalid UPSTREAM_REFERER")?,
    );

    Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(config.fetch_timeout())
        .gzip(true)
        .build()
        .context("Failed to create HTTP client")
}

struct CachedPayload {
    fetched_at: Instant,
    value: Value,
}

/// reqwest-backed fetcher with a short-lived in-memory LRU
pub struct HttpFetcher {
    client: Client,
    ttl: Duration,
    cache: Mutex<LruCache<String, CachedPayload>>,
}

impl HttpFetcher {
    pub fn new(client: Client, ttl: Duration, max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            client,
            ttl,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn cached(&self, url: &str) -> Option<Value> {
        let mut cache = self.cache.lock().ok()?;
        let fresh = match cache.get(url) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => None,
            None => return None,
        };
        if fresh.is_none() {
            cache.pop(url);
        }
        fresh
    }

    fn store(&self, url: &str, value: &Value) {
        if self.ttl.is_zero() {
            return;
        }
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                url.to_string(),
                CachedPayload {
                    fetched_at: Instant::now(),
                    value: value.clone(),
                },
            );
        }
    }

    async fn request(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        match response.json::<Value>().await.map_err(FetchError::Decode)? {
            Value::Null => Err(FetchError::Empty),
            value => Ok(value),
        }
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Option<Value> {
        if let Some(value) = self.cached(url) {
            UPSTREAM_REQUESTS.with_label_values(&["cached"]).inc();
            debug!("Upstream cache hit: {}", url);
            return Some(value);
        }

        match self.request(url).await {
            Ok(value) => {
                UPSTREAM_REQUESTS.with_label_values(&["ok"]).inc();
                self.store(url, &value);
                Some(value)
            }
            Err(e) => {
                UPSTREAM_REQUESTS.with_label_values(&[e.outcome()]).inc();
                warn!("Upstream fetch failed for {}: {}", url, e);
                None
            }
        }
    }

    fn cached_entries(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(ttl: Duration) -> HttpFetcher {
        let mut config = Config::from_env();
        config.upstream_referer = "https://upstream.test/".to_string();
        config.user_agent = "dramafeed-test".to_string();
        HttpFetcher::new(build_client(&config).unwrap(), ttl, 8)
    }

    #[tokio::test]
    async fn test_fetch_sends_identity_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dramabox/trending"))
            .and(header("referer", "https://upstream.test/"))
            .and(header("user-agent", "dramafeed-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"bookId": "1"}])))
            .expect(1)
            .mount(&server)
            .await;

        let value = fetcher(Duration::ZERO)
            .fetch_json(&format!("{}/dramabox/trending", server.uri()))
            .await;
        assert_eq!(value, Some(json!([{"bookId": "1"}])));
    }

    #[tokio::test]
    async fn test_fetch_caches_within_ttl() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/melolo/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"books": []})))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher(Duration::from_secs(60));
        let url = format!("{}/melolo/latest", server.uri());
        assert!(fetcher.fetch_json(&url).await.is_some());
        assert!(fetcher.fetch_json(&url).await.is_some());
        assert_eq!(fetcher.cached_entries(), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_none_and_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .expect(2)
            .mount(&server)
            .await;

        let fetcher = fetcher(Duration::from_secs(60));
        let url = format!("{}/netshort/foryou", server.uri());
        assert!(fetcher.fetch_json(&url).await.is_none());
        assert!(fetcher.fetch_json(&url).await.is_none());
        assert_eq!(fetcher.cached_entries(), 0);
    }

    #[tokio::test]
    async fn test_fetch_invalid_json_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
            .mount(&server)
            .await;

        let value = fetcher(Duration::ZERO)
            .fetch_json(&format!("{}/moviebox/trending", server.uri()))
            .await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_fetch_null_payload_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("null", "application/json"))
            .mount(&server)
            .await;

        let value = fetcher(Duration::ZERO)
            .fetch_json(&format!("{}/flickreels/latest", server.uri()))
            .await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_none() {
        let value = fetcher(Duration::ZERO)
            .fetch_json("http://127.0.0.1:1/unreachable")
            .await;
        assert!(value.is_none());
    }
}
