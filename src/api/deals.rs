//! Deals service for the CRM objects endpoint.

use std::sync::Arc;

use futures_util::future::FutureExt;
use serde::Serialize;

use crate::client::paginated::{CursorPage, CursorStream, DEFAULT_PAGE_SIZE};
use crate::client::ClientInner;
use crate::models::{Cursor, Deal, DealsPage};
use crate::{Error, Result};

/// Path of the deals collection, relative to the API root.
pub const DEALS_PATH: &str = "/crm/v3/objects/deals";

/// Service for listing deals.
///
/// # Example
///
/// ```no_run
/// use hubspot_deals::api::DealsQuery;
///
/// # async fn example(client: hubspot_deals::HubSpotClient) -> hubspot_deals::Result<()> {
/// let query = DealsQuery::new().limit(50).property("dealname");
///
/// let first = client.deals().fetch_page(&query, None).await?;
/// for deal in &first.results {
///     println!("{}: {:?}", deal.id, deal.name());
/// }
///
/// if let Some(cursor) = first.next_cursor() {
///     let second = client.deals().fetch_page(&query, Some(&cursor)).await?;
///     println!("next page has {} deals", second.results.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct DealsService {
    inner: Arc<ClientInner>,
}

/// Parameters shared by every page of a deals listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealsQuery {
    /// Deals per page
    pub limit: u32,
    /// Properties to include on each deal; empty for HubSpot's defaults
    pub properties: Vec<String>,
}

impl Default for DealsQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            properties: Vec::new(),
        }
    }
}

impl DealsQuery {
    /// Create a query with the default page size and no properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Request one more property.
    pub fn property(mut self, name: impl Into<String>) -> Self {
        self.properties.push(name.into());
        self
    }

    /// Replace the requested properties.
    pub fn properties<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = names.into_iter().map(Into::into).collect();
        self
    }
}

/// Query string of a single page request.
#[derive(Debug, Serialize)]
struct PageParams<'a> {
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<String>,
}

impl<'a> PageParams<'a> {
    fn new(query: &DealsQuery, after: Option<&'a Cursor>) -> Self {
        Self {
            limit: query.limit,
            after: after.map(Cursor::as_str),
            properties: if query.properties.is_empty() {
                None
            } else {
                Some(query.properties.join(","))
            },
        }
    }
}

impl DealsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Fetch one page of deals.
    ///
    /// Starts from the beginning of the collection when `after` is `None`.
    /// Rate-limited responses are retried according to the client's
    /// [`RetryConfig`](crate::RetryConfig).
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if `query.limit` is zero
    /// - [`Error::Api`] for any error status other than 429
    /// - [`Error::RateLimited`] if a retry cap is configured and exhausted
    pub async fn fetch_page(&self, query: &DealsQuery, after: Option<&Cursor>) -> Result<DealsPage> {
        fetch_page(&self.inner, query, after).await
    }

    /// Stream every deal in the collection.
    ///
    /// Pages are fetched on demand as the stream is polled.
    pub fn iterate_all(&self, query: DealsQuery) -> CursorStream<Deal> {
        let inner = self.inner.clone();

        CursorStream::new(move |cursor: Option<Cursor>| {
            let inner = inner.clone();
            let query = query.clone();

            async move {
                let page = fetch_page(&inner, &query, cursor.as_ref()).await?;
                Ok(CursorPage::from(page))
            }
            .boxed()
        })
    }
}

async fn fetch_page(
    inner: &ClientInner,
    query: &DealsQuery,
    after: Option<&Cursor>,
) -> Result<DealsPage> {
    if query.limit == 0 {
        return Err(Error::InvalidInput("page limit must be positive".to_string()));
    }

    tracing::debug!(
        limit = query.limit,
        after = after.map(Cursor::as_str),
        "Fetching deals page"
    );

    let page: DealsPage = inner
        .get_with_query(DEALS_PATH, &PageParams::new(query, after))
        .await?;

    tracing::debug!(
        count = page.results.len(),
        has_more = page.next_cursor().is_some(),
        "Fetched deals page"
    );
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Query keys that would be sent, sorted.
    fn keys(params: &PageParams<'_>) -> Vec<String> {
        let value = serde_json::to_value(params).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_first_page_params() {
        let query = DealsQuery::new();
        let params = PageParams::new(&query, None);
        assert_eq!(params.limit, 100);
        assert_eq!(keys(&params), vec!["limit"]);
    }

    #[test]
    fn test_properties_are_comma_joined() {
        let query = DealsQuery::new()
            .limit(10)
            .properties(["dealname", "amount", "dealstage"]);
        let cursor = Cursor::new("42").unwrap();
        let params = PageParams::new(&query, Some(&cursor));

        assert_eq!(params.after, Some("42"));
        assert_eq!(params.properties.as_deref(), Some("dealname,amount,dealstage"));
        assert_eq!(keys(&params), vec!["after", "limit", "properties"]);
    }

    #[test]
    fn test_query_builder() {
        let query = DealsQuery::new().property("dealname").property("amount");
        assert_eq!(query.properties, vec!["dealname", "amount"]);
        assert_eq!(query.limit, DEFAULT_PAGE_SIZE);
    }
}
