//! Sliding-window rate limiter.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use super::clock::{Clock, SystemClock};
use crate::{Error, Result};

/// Shortest sleep taken when the window is full, so that a tie between
/// the oldest timestamp's expiry and `now` still yields.
const MIN_SLEEP: Duration = Duration::from_millis(10);

/// Configuration for the sliding-window limiter.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use hubspot_deals::rate_limit::RateLimitConfig;
///
/// let config = RateLimitConfig::default()
///     .with_max_requests(100)
///     .with_window(Duration::from_secs(10));
/// assert_eq!(config.max_requests, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum admitted requests per window
    pub max_requests: usize,
    /// Length of the trailing window
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 150,
            window: Duration::from_secs(10),
        }
    }
}

impl RateLimitConfig {
    /// Set the maximum number of requests per window.
    pub fn with_max_requests(mut self, max_requests: usize) -> Self {
        self.max_requests = max_requests;
        self
    }

    /// Set the window length.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Check that both limits are non-zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_requests == 0 {
            return Err(Error::Config("max_requests must be positive".to_string()));
        }
        if self.window.is_zero() {
            return Err(Error::Config("window must be positive".to_string()));
        }
        Ok(())
    }
}

/// Throttles outbound requests so that at most `max_requests` are admitted
/// in any trailing `window`.
///
/// When the window is full, [`admit`](Self::admit) sleeps until the oldest
/// admission ages out and then admits the caller without re-checking. Under
/// a burst this lets one extra request through per forced wake, so the
/// ceiling is a soft one.
///
/// The timestamp queue sits behind an async mutex that is held across the
/// sleep, which serializes callers. Share one limiter between several
/// clients by wrapping it in an [`Arc`] and passing it to
/// [`HubSpotClient::with_rate_limiter`](crate::HubSpotClient::with_rate_limiter).
pub struct RateLimiter {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter driven by the system clock.
    ///
    /// The configuration is not checked, and a zero `max_requests` or
    /// `window` leaves requests effectively unthrottled. Use
    /// [`try_new`](Self::try_new) for the checked path.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a limiter after validating its configuration.
    pub fn try_new(config: RateLimitConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Create a limiter driven by a custom clock.
    ///
    /// Like [`new`](Self::new), this does not validate `config`.
    /// [`HubSpotClient::with_rate_limiter`](crate::HubSpotClient::with_rate_limiter)
    /// rejects an invalid limiter when it is handed one.
    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            timestamps: Mutex::new(VecDeque::new()),
        }
    }

    /// Wait for permission to send one request.
    ///
    /// Returns how long the caller was held back; zero when the window had
    /// room.
    pub async fn admit(&self) -> Duration {
        let mut timestamps = self.timestamps.lock().await;
        let now = self.clock.now();

        while let Some(&oldest) = timestamps.front() {
            if now.duration_since(oldest) > self.config.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }

        let mut waited = Duration::ZERO;
        if timestamps.len() >= self.config.max_requests {
            if let Some(&oldest) = timestamps.front() {
                let sleep_for = (oldest + self.config.window).saturating_duration_since(now);
                waited = sleep_for.max(MIN_SLEEP);
                tracing::warn!(
                    in_window = timestamps.len(),
                    max_requests = self.config.max_requests,
                    "Rate limit hit: sleeping for {:.2}s",
                    waited.as_secs_f64()
                );
                self.clock.sleep(waited).await;
            }
        }

        timestamps.push_back(self.clock.now());
        waited
    }

    /// Number of admissions still tracked.
    ///
    /// Entries are only evicted inside [`admit`](Self::admit), so this may
    /// include timestamps that have already aged out.
    pub async fn tracked(&self) -> usize {
        self.timestamps.lock().await.len()
    }

    /// The limiter's configuration.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// The clock this limiter sleeps on.
    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .finish()
    }
}
