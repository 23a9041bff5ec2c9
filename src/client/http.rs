//! HTTP client implementation for the HubSpot CRM API.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use url::Url;

use crate::api::{DealsQuery, DealsService, DEALS_PATH};
use crate::models::Deal;
use crate::rate_limit::RateLimiter;
use crate::{Error, Result};

use super::config::ClientConfig;
use super::paginated::CursorStream;

/// The main client for the HubSpot CRM deals API.
///
/// The client owns an HTTP connection pool, the bearer token, and a
/// [`RateLimiter`] that every request passes through. Cloning is cheap and
/// clones share all three.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
/// use hubspot_deals::HubSpotClient;
///
/// # async fn example() -> hubspot_deals::Result<()> {
/// let client = HubSpotClient::new("pat-na1-00000000-0000")?;
/// client.validate_credentials().await?;
///
/// let mut deals = client.iterate_all_deals(vec!["dealname".into(), "amount".into()], 100);
/// while let Some(deal) = deals.next().await {
///     let deal = deal?;
///     println!("{} {:?}", deal.id, deal.name());
/// }
/// # Ok(())
/// # }
/// ```
pub struct HubSpotClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) access_token: SecretString,
    pub(crate) base_url: String,
    pub(crate) config: ClientConfig,
    pub(crate) limiter: Arc<RateLimiter>,
}

impl HubSpotClient {
    /// Create a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Credential`] if the token is empty. No request is
    /// made.
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        Self::with_config(access_token, ClientConfig::default())
    }

    /// Create a client with a custom configuration and its own limiter.
    pub fn with_config(access_token: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let limiter = RateLimiter::try_new(config.rate_limit.clone())?;
        Self::with_rate_limiter(access_token, config, Arc::new(limiter))
    }

    /// Create a client that throttles through an existing limiter.
    ///
    /// Passing the same limiter to several clients makes them share one
    /// request budget. `config.rate_limit` is ignored in this case. The
    /// limiter's clock is also used for 429 retry delays. A limiter whose
    /// configuration has a zero limit or window is rejected with
    /// [`Error::Config`].
    pub fn with_rate_limiter(
        access_token: impl Into<String>,
        config: ClientConfig,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self> {
        limiter.config().validate()?;

        let access_token = SecretString::from(access_token.into());
        if access_token.expose_secret().trim().is_empty() {
            return Err(Error::Credential("Missing HubSpot access token".to_string()));
        }

        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let inner = ClientInner {
            http,
            access_token,
            base_url,
            config,
            limiter,
        };
        // Reject tokens that cannot be sent as a header before any request.
        inner.build_headers()?;

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Check that the token is accepted and has the deals read scope.
    ///
    /// Sends a single `limit=1` listing request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Credential`] on 401 or 403. Other error statuses
    /// are reported as `Ok(false)` rather than an error.
    pub async fn validate_credentials(&self) -> Result<bool> {
        let response = self
            .inner
            .send_get(DEALS_PATH, &[("limit", 1u32)])
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                Err(Error::Credential("invalid token (401)".to_string()))
            }
            StatusCode::FORBIDDEN => Err(Error::Credential(
                "token missing crm.objects.deals.read scope (403)".to_string(),
            )),
            status if status.as_u16() < 400 => {
                tracing::info!("HubSpot credentials validated");
                Ok(true)
            }
            status => {
                tracing::warn!(status = status.as_u16(), "Credential check returned an error status");
                Ok(false)
            }
        }
    }

    /// Get the deals service.
    pub fn deals(&self) -> DealsService {
        DealsService::new(self.inner.clone())
    }

    /// Stream every deal, fetching `limit` per page and requesting the
    /// given properties (an empty list requests HubSpot's defaults).
    ///
    /// Shorthand for `client.deals().iterate_all(...)`.
    pub fn iterate_all_deals(&self, properties: Vec<String>, limit: u32) -> CursorStream<Deal> {
        self.deals()
            .iterate_all(DealsQuery::new().limit(limit).properties(properties))
    }

    /// The limiter this client throttles through.
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.inner.limiter
    }

    /// The client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl ClientInner {
    /// Build request headers with authentication.
    pub(crate) fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!(
            "Bearer {}",
            self.access_token.expose_secret()
        ))
        .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    /// Wait for the limiter, then send one GET request.
    pub(crate) async fn send_get<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<reqwest::Response> {
        self.limiter.admit().await;

        let url = format!("{}{}", self.base_url, path);
        let headers = self.build_headers()?;

        let response = self
            .http
            .get(&url)
            .headers(headers)
            .query(query)
            .send()
            .await?;

        Ok(response)
    }

    /// Make a GET request with query parameters, resending on 429.
    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let retry = &self.config.retry;
        let mut retries = 0u32;

        loop {
            let response = self.send_get(path, query).await?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return self.handle_response(response).await;
            }

            if !retry.allows_retry(retries) {
                return Err(Error::RateLimited {
                    attempts: retries + 1,
                });
            }
            retries += 1;

            tracing::warn!(
                retry = retries,
                "HubSpot returned 429; retrying in {:?}",
                retry.rate_limit_delay
            );
            self.limiter.clock().sleep(retry.rate_limit_delay).await;
        }
    }

    /// Handle an API response.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_client_error() || status.is_server_error() {
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl Clone for HubSpotClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for HubSpotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubSpotClient")
            .field("base_url", &self.inner.base_url)
            .field("config", &self.inner.config)
            .finish()
    }
}
