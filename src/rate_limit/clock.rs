//! Time sources for the rate limiter and retry delays.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::{self, BoxFuture, FutureExt};
use parking_lot::Mutex;

/// A source of monotonic time that can also put the caller to sleep.
///
/// The limiter and the client's 429 retry path both go through a `Clock`,
/// so a test can swap in [`ManualClock`] and observe every delay without
/// actually waiting.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Instant;

    /// Suspend the caller for `duration`.
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Wall-clock time backed by Tokio's timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        tokio::time::sleep(duration).boxed()
    }
}

/// A virtual clock for deterministic tests.
///
/// Time only moves when [`advance`](Self::advance) is called or when
/// something sleeps on it; sleeping completes immediately and is recorded.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use hubspot_deals::rate_limit::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(3));
/// assert_eq!(clock.now() - start, Duration::from_secs(3));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualClockInner>>,
}

#[derive(Debug)]
struct ManualClockInner {
    origin: Instant,
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    /// Create a clock frozen at the current instant.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualClockInner {
                origin: Instant::now(),
                elapsed: Duration::ZERO,
                sleeps: Vec::new(),
            })),
        }
    }

    /// Move virtual time forward without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        self.inner.lock().elapsed += duration;
    }

    /// Virtual time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.inner.lock().elapsed
    }

    /// Every duration passed to [`Clock::sleep`], in call order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.inner.lock().sleeps.clone()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let inner = self.inner.lock();
        inner.origin + inner.elapsed
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        let mut inner = self.inner.lock();
        inner.elapsed += duration;
        inner.sleeps.push(duration);
        future::ready(()).boxed()
    }
}
