//! Runtime configuration for the image API client and cache

use crate::error::{GalleryError, Result};
use std::time::Duration;

/// Production Unsplash API endpoint
pub const DEFAULT_API_URL: &str = "https://api.unsplash.com";

/// Environment variable holding the Unsplash access key
pub const ACCESS_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";

/// Top-level configuration
#[derive(Debug, Clone, Default)]
pub struct GalleryConfig {
    pub api: ApiConfig,
    pub cache: CacheConfig,
}

/// Remote image API settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL without trailing slash
    pub base_url: String,
    /// Unsplash access key ("client id")
    pub access_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            access_key: String::new(),
        }
    }
}

impl ApiConfig {
    /// Build from the environment, using the production endpoint
    pub fn from_env() -> Self {
        let access_key = std::env::var(ACCESS_KEY_ENV).unwrap_or_default();
        if access_key.is_empty() {
            log::warn!(
                "{} is not set, remote requests will be rejected and fallback images used",
                ACCESS_KEY_ENV
            );
        }
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            access_key,
        }
    }

    /// Point the client at a different endpoint (mock servers, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = access_key.into();
        self
    }
}

/// Image cache and retry policy
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a fetched page stays valid
    pub ttl: Duration,
    /// How often the background sweeper purges expired entries
    pub sweep_interval: Duration,
    /// Total attempts per fetch, including the first one
    pub max_attempts: u32,
    /// Backoff before attempt `n + 1` is `n * retry_base_delay`
    pub retry_base_delay: Duration,
    /// Upper bound on images per request. `/photos/random` rejects more than 30
    pub max_count: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30 * 60),
            sweep_interval: Duration::from_secs(5 * 60),
            max_attempts: 3,
            retry_base_delay: Duration::from_secs(1),
            max_count: 30,
        }
    }
}

impl CacheConfig {
    /// Reject values that would make the cache unusable
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(GalleryError::Config(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.max_count == 0 {
            return Err(GalleryError::Config(
                "max_count must be at least 1".to_string(),
            ));
        }
        if self.sweep_interval.is_zero() {
            return Err(GalleryError::Config(
                "sweep_interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Delay to wait after a failed `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_base_delay * attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cache_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(1800));
        assert_eq!(config.sweep_interval, Duration::from_secs(300));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.max_count, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backoff_is_linear() {
        let config = CacheConfig {
            retry_base_delay: Duration::from_millis(100),
            ..CacheConfig::default()
        };
        assert_eq!(config.backoff(1), Duration::from_millis(100));
        assert_eq!(config.backoff(2), Duration::from_millis(200));
        assert_eq!(config.backoff(3), Duration::from_millis(300));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let config = CacheConfig {
            max_attempts: 0,
            ..CacheConfig::default()
        };
        assert!(matches!(config.validate(), Err(GalleryError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_count_cap() {
        let config = CacheConfig {
            max_count: 0,
            ..CacheConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = ApiConfig::default().with_base_url("http://127.0.0.1:8080/");
        assert_eq!(api.base_url, "http://127.0.0.1:8080");
    }
}
