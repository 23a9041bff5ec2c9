//! Client configuration options.

use std::time::Duration;

use crate::models::DEFAULT_BASE_URL;
use crate::rate_limit::RateLimitConfig;

/// Configuration for the HubSpot client.
///
/// # Example
///
/// ```
/// use hubspot_deals::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("deals-etl/2.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, without the resource path
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Handling of 429 responses
    pub retry: RetryConfig,
    /// Client-side throttle, used unless a limiter is injected
    pub rate_limit: RateLimitConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("hubspot-deals-rs/{}", env!("CARGO_PKG_VERSION")),
            retry: RetryConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the client-side rate limit.
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}

/// How the client reacts to `429 Too Many Requests`.
///
/// Rate-limited requests are retried after a fixed delay. By default there
/// is no cap, so a server that never stops answering 429 stalls the caller;
/// set [`max_rate_limit_retries`](Self::max_rate_limit_retries) to turn that
/// into an [`Error::RateLimited`](crate::Error::RateLimited) instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Delay before resending a rate-limited request
    pub rate_limit_delay: Duration,
    /// Maximum number of resends after a 429, `None` for unlimited
    pub max_rate_limit_retries: Option<u32>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            rate_limit_delay: Duration::from_secs(1),
            max_rate_limit_retries: None,
        }
    }
}

impl RetryConfig {
    /// Set the delay between rate-limited attempts.
    pub fn with_rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    /// Cap the number of resends after a 429.
    pub fn with_max_rate_limit_retries(mut self, max: u32) -> Self {
        self.max_rate_limit_retries = Some(max);
        self
    }

    /// Whether another resend is allowed after `retries` have been made.
    pub fn allows_retry(&self, retries: u32) -> bool {
        self.max_rate_limit_retries.map_or(true, |max| retries < max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://api.hubapi.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("hubspot-deals-rs/"));
        assert_eq!(config.rate_limit.max_requests, 150);
    }

    #[test]
    fn test_default_retry_is_unbounded() {
        let retry = RetryConfig::default();
        assert_eq!(retry.rate_limit_delay, Duration::from_secs(1));
        assert!(retry.allows_retry(0));
        assert!(retry.allows_retry(u32::MAX - 1));
    }

    #[test]
    fn test_retry_cap() {
        let retry = RetryConfig::default().with_max_rate_limit_retries(2);
        assert!(retry.allows_retry(0));
        assert!(retry.allows_retry(1));
        assert!(!retry.allows_retry(2));
    }
}
