//! # hubspot-deals
//!
//! A rate-limited extract client for HubSpot CRM deals.
//!
//! The crate authenticates with a private-app access token, checks that the
//! token can read deals, and walks the `/crm/v3/objects/deals` collection
//! page by page while staying under HubSpot's request burst limit.
//!
//! ## Features
//!
//! - **Credential check**: distinguishes a bad token (401) from a missing
//!   scope (403)
//! - **Lazy pagination**: a `Stream` of deals that fetches the next page
//!   only when the current one is used up
//! - **Client-side throttling**: sliding-window limiter, shareable between
//!   clients
//! - **429 handling**: fixed-delay retry with an optional cap
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use hubspot_deals::HubSpotClient;
//!
//! #[tokio::main]
//! async fn main() -> hubspot_deals::Result<()> {
//!     let client = HubSpotClient::new(std::env::var("HUBSPOT_ACCESS_TOKEN").unwrap_or_default())?;
//!     client.validate_credentials().await?;
//!
//!     let mut deals = client
//!         .iterate_all_deals(vec!["dealname".into(), "amount".into()], 100)
//!         .take(10);
//!
//!     while let Some(deal) = deals.next().await {
//!         let deal = deal?;
//!         println!("{} {}", deal.id, deal.name().unwrap_or("-"));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Sharing a rate limit
//!
//! ```rust
//! use std::sync::Arc;
//! use hubspot_deals::{ClientConfig, HubSpotClient};
//! use hubspot_deals::rate_limit::{RateLimitConfig, RateLimiter};
//!
//! # fn main() -> hubspot_deals::Result<()> {
//! let limiter = Arc::new(RateLimiter::new(RateLimitConfig::default()));
//!
//! let a = HubSpotClient::with_rate_limiter("token-a", ClientConfig::default(), limiter.clone())?;
//! let b = HubSpotClient::with_rate_limiter("token-b", ClientConfig::default(), limiter)?;
//! assert!(Arc::ptr_eq(a.rate_limiter(), b.rate_limiter()));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod rate_limit;

// Re-export primary types at crate root for convenience
pub use error::{Error, Result};
pub use models::{Cursor, Deal, DealId, DealsPage, DEFAULT_BASE_URL};
pub use client::{ClientConfig, CursorStream, HubSpotClient, RetryConfig};
pub use rate_limit::{RateLimitConfig, RateLimiter};

/// Prelude module for convenient imports.
///
/// ```rust
/// use hubspot_deals::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{DealsQuery, DealsService};
    pub use crate::client::{ClientConfig, CursorStream, HubSpotClient, RetryConfig};
    pub use crate::error::{Error, Result};
    pub use crate::models::{Cursor, Deal, DealId, DealsPage};
    pub use crate::rate_limit::{Clock, ManualClock, RateLimitConfig, RateLimiter, SystemClock};
}
