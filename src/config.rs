//! Client configuration: backend base address and timeouts.
//!
//! Built explicitly with [`ClientConfig::new`] or read from environment
//! variables by [`ClientConfig::from_env`]. Immutable once constructed.

use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 3_000;

pub const ENV_BASE_URL: &str = "ARENA_API_URL";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "ARENA_REQUEST_TIMEOUT_MS";
pub const ENV_CONNECT_TIMEOUT_MS: &str = "ARENA_CONNECT_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    request_timeout: Duration,
    connect_timeout: Duration,
}

impl ClientConfig {
    /// Build a config for `base_url` with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
        })
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `ARENA_API_URL`: default `http://localhost:3001`
    /// - `ARENA_REQUEST_TIMEOUT_MS`: default 10000
    /// - `ARENA_CONNECT_TIMEOUT_MS`: default 3000
    ///
    /// # Errors
    ///
    /// Returns an error if `ARENA_API_URL` is not an absolute http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute http(s) URL.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let request_ms = parse_u64(lookup(ENV_REQUEST_TIMEOUT_MS), DEFAULT_REQUEST_TIMEOUT_MS);
        let connect_ms = parse_u64(lookup(ENV_CONNECT_TIMEOUT_MS), DEFAULT_CONNECT_TIMEOUT_MS);

        Ok(Self::new(&base_url)?
            .with_request_timeout(Duration::from_millis(request_ms))
            .with_connect_timeout(Duration::from_millis(connect_ms)))
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Upper bound on a whole operation, from send to decoded body.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Join path segments onto the base URL. Each segment is percent-encoded,
    /// so ids containing `/` or `?` stay a single segment.
    #[must_use]
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Base URLs are validated as http(s), which always have a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ConfigError::UnsupportedScheme(other.to_owned())),
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_owned(),
            reason: "base URL must not carry a query or fragment".to_owned(),
        });
    }
    Ok(url)
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
