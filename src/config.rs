use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub app_env: String,

    // Upstream API
    pub upstream_base_url: String,
    pub upstream_referer: String,
    pub user_agent: String,
    pub fetch_timeout_ms: u64,

    // Freshness windows for upstream payloads
    pub listing_cache_ttl_secs: u64,
    pub detail_cache_ttl_secs: u64,
    pub fetch_cache_max_entries: usize,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Server
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .unwrap_or(3001),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),

            // Upstream API
            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .unwrap_or_else(|_| "https://api.sansekai.my.id/api".to_string())
                .trim_end_matches('/')
                .to_string(),
            upstream_referer: env::var("UPSTREAM_REFERER")
                .unwrap_or_else(|_| "https://api.sansekai.my.id/".to_string()),

            // Upstream rejects non-browser agents
            user_agent: env::var("USER_AGENT").unwrap_or_else(|_| {
                "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 (KHTML, like Gecko) \
                 Chrome/120.0.0.0 Mobile Safari/537.36"
                    .to_string()
            }),

            fetch_timeout_ms: env::var("FETCH_TIMEOUT_MS")
                .unwrap_or_else(|_| "15000".to_string())
                .parse()
                .unwrap_or(15_000), // 15 seconds

            // Cache
            listing_cache_ttl_secs: env::var("LISTING_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),

            detail_cache_ttl_secs: env::var("DETAIL_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap_or(300), // 5 minutes

            fetch_cache_max_entries: env::var("FETCH_CACHE_MAX_ENTRIES")
                .unwrap_or_else(|_| "512".to_string())
                .parse()
                .unwrap_or(512),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn listing_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.listing_cache_ttl_secs)
    }

    pub fn detail_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.detail_cache_ttl_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
