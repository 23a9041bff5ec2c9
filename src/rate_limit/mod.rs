//! Client-side request throttling.
//!
//! HubSpot private apps are allowed a burst of requests per rolling
//! ten-second window. [`RateLimiter`] keeps the client under that ceiling
//! with a sliding window of admission timestamps, and [`Clock`] abstracts
//! time so the throttle can be driven deterministically in tests.

mod clock;
mod limiter;

pub use clock::{Clock, ManualClock, SystemClock};
pub use limiter::{RateLimitConfig, RateLimiter};
