//! Client settings read from the environment (and `.env` when present).

use crate::error::ConfigError;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(60);
pub const DEFAULT_CACHE_TIME: Duration = Duration::from_secs(300);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_DELETE_CONCURRENCY: usize = 4;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Scheme and host of the backend; resource paths are appended to it.
    pub api_url: String,
    /// How long a cached read is served without a request. Zero disables cache hits.
    pub stale_time: Duration,
    /// How long any cached read is kept before it is garbage-collected.
    pub cache_time: Duration,
    /// Handed to the HTTP transport; the data layer adds no timeout of its own.
    pub request_timeout: Duration,
    /// Upper bound on concurrent single deletes when bulk delete is unavailable.
    pub delete_concurrency: usize,
    /// Bearer token from the session store, if signed in.
    pub api_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            stale_time: DEFAULT_STALE_TIME,
            cache_time: DEFAULT_CACHE_TIME,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            delete_concurrency: DEFAULT_DELETE_CONCURRENCY,
            api_token: None,
        }
    }
}

impl ClientConfig {
    /// Read `COOP_API_URL`, `COOP_STALE_TIME_SECS`, `COOP_CACHE_TIME_SECS`,
    /// `COOP_HTTP_TIMEOUT_SECS`, `COOP_DELETE_CONCURRENCY` and `COOP_API_TOKEN`. Unset variables keep defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup("COOP_API_URL") {
            let url = url.trim().trim_end_matches('/').to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Env(format!(
                    "COOP_API_URL must be an http(s) url, got '{}'",
                    url
                )));
            }
            config.api_url = url;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "COOP_STALE_TIME_SECS")? {
            config.stale_time = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "COOP_CACHE_TIME_SECS")? {
            config.cache_time = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "COOP_HTTP_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = parse_var::<usize>(&lookup, "COOP_DELETE_CONCURRENCY")? {
            config.delete_concurrency = n.max(1);
        }
        config.api_token = lookup("COOP_API_TOKEN").filter(|t| !t.trim().is_empty());
        Ok(config)
    }

    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn with_cache_time(mut self, cache_time: Duration) -> Self {
        self.cache_time = cache_time;
        self
    }

    pub fn with_delete_concurrency(mut self, n: usize) -> Self {
        self.delete_concurrency = n.max(1);
        self
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env(format!("{} is not a valid number: '{}'", key, raw))),
    }
}
