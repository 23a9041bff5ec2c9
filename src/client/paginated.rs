//! Cursor-driven stream for lazy iteration over list endpoints.
//!
//! [`CursorStream`] implements `Stream`, fetching the next page only once
//! every item of the current page has been handed out.

use std::collections::VecDeque;
use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use futures_util::Stream;

use crate::models::{Cursor, Deal, DealsPage};
use crate::Result;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// One fetched page reduced to what the stream needs.
#[derive(Debug, Clone)]
pub struct CursorPage<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Token for the following page, `None` on the last page.
    pub next_cursor: Option<Cursor>,
}

impl From<DealsPage> for CursorPage<Deal> {
    fn from(page: DealsPage) -> Self {
        let next_cursor = page.next_cursor();
        Self {
            items: page.results,
            next_cursor,
        }
    }
}

type FetchFn<T> = Box<
    dyn Fn(Option<Cursor>) -> BoxFuture<'static, Result<CursorPage<T>>> + Send + Sync,
>;

enum NextFetch {
    Start,
    After(Cursor),
    Done,
}

/// A stream that lazily walks a cursor-paginated endpoint.
///
/// Items are yielded in page order, then in the order the server returned
/// them. The stream ends when a page carries no continuation token. An
/// empty page that still has a token does not end it.
///
/// Dropping the stream (or stopping with `StreamExt::take`) means no
/// further pages are requested. After an error is yielded the stream is
/// finished.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
///
/// # async fn example(client: hubspot_deals::HubSpotClient) -> hubspot_deals::Result<()> {
/// // Only the pages needed for the first 10 deals are fetched
/// let mut stream = client.iterate_all_deals(Vec::new(), 100).take(10);
///
/// while let Some(result) = stream.next().await {
///     let deal = result?;
///     println!("{}", deal.id);
/// }
/// # Ok(())
/// # }
/// ```
pub struct CursorStream<T> {
    /// Function to fetch a page after a cursor.
    fetch_page: FetchFn<T>,
    /// Items of the current page not yet yielded.
    current_items: VecDeque<T>,
    /// What to fetch once the current page is exhausted.
    next: NextFetch,
    /// Current in-flight fetch future.
    pending_fetch: Option<BoxFuture<'static, Result<CursorPage<T>>>>,
    pages_fetched: usize,
}

impl<T> CursorStream<T> {
    /// Create a stream that starts from the beginning of the collection.
    pub fn new<F>(fetch_page: F) -> Self
    where
        F: Fn(Option<Cursor>) -> BoxFuture<'static, Result<CursorPage<T>>> + Send + Sync + 'static,
    {
        Self {
            fetch_page: Box::new(fetch_page),
            current_items: VecDeque::new(),
            next: NextFetch::Start,
            pending_fetch: None,
            pages_fetched: 0,
        }
    }

    /// Number of pages received so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

impl<T> Stream for CursorStream<T> {
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if let Some(item) = this.current_items.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            if let Some(fut) = this.pending_fetch.as_mut() {
                match fut.as_mut().poll(cx) {
                    Poll::Ready(Ok(page)) => {
                        this.pending_fetch = None;
                        this.pages_fetched += 1;
                        this.current_items = page.items.into();
                        this.next = match page.next_cursor {
                            Some(cursor) => NextFetch::After(cursor),
                            None => NextFetch::Done,
                        };
                        continue;
                    }
                    Poll::Ready(Err(e)) => {
                        this.pending_fetch = None;
                        this.next = NextFetch::Done;
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => return Poll::Pending,
                }
            }

            let cursor = match mem::replace(&mut this.next, NextFetch::Done) {
                NextFetch::Start => None,
                NextFetch::After(cursor) => Some(cursor),
                NextFetch::Done => return Poll::Ready(None),
            };
            this.pending_fetch = Some((this.fetch_page)(cursor));
        }
    }
}

impl<T> Unpin for CursorStream<T> {}
