//! HTTP client and service layer for the HubSpot CRM API.
//!
//! This module provides the main entry point [`HubSpotClient`].
//!
//! # Example
//!
//! ```no_run
//! use hubspot_deals::{ClientConfig, HubSpotClient};
//! use std::time::Duration;
//!
//! # async fn example() -> hubspot_deals::Result<()> {
//! let config = ClientConfig::default().with_timeout(Duration::from_secs(10));
//! let client = HubSpotClient::with_config("pat-na1-...", config)?;
//!
//! if client.validate_credentials().await? {
//!     let page = client.deals().fetch_page(&Default::default(), None).await?;
//!     println!("{} deals on the first page", page.results.len());
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod paginated;

pub use config::{ClientConfig, RetryConfig};
pub use http::HubSpotClient;
pub use paginated::{CursorPage, CursorStream, DEFAULT_PAGE_SIZE};
pub(crate) use http::ClientInner;
