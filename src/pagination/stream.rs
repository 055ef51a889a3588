//! Lazy auto-pagination streams
//!
//! [`Pages`] drives a page-fetching closure across all pages, one request
//! at a time. [`Paginator`] flattens it into a stream of items. Nothing is
//! prefetched: page N is fully drained before page N+1 is requested.

use super::strategies::next_query;
use super::types::{ListQuery, NextPage, PageEnvelope};
use crate::cancel::{self, CancellationToken};
use crate::error::{Error, Result};
use futures::{Stream, TryStreamExt};
use pin_project_lite::pin_project;
use std::collections::VecDeque;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;

pin_project! {
    /// Stream of whole pages
    ///
    /// Yields each [`PageEnvelope`] as it arrives. A pagination integrity
    /// failure is reported after the page that exposed it, then the stream
    /// ends.
    pub struct Pages<T, Q, F, Fut>
    where
        Q: ListQuery,
        F: FnMut(Q) -> Fut,
        Fut: Future<Output = Result<PageEnvelope<T>>>,
    {
        next_query: Option<Q>,
        in_flight: Option<Q>,
        fetcher: F,
        #[pin]
        current_fetch: Option<Fut>,
        cancel: Option<CancellationToken>,
        pending_error: Option<Error>,
        pages_fetched: u32,
        done: bool,
        _item: PhantomData<fn() -> T>,
    }
}

impl<T, Q, F, Fut> Pages<T, Q, F, Fut>
where
    Q: ListQuery,
    F: FnMut(Q) -> Fut,
    Fut: Future<Output = Result<PageEnvelope<T>>>,
{
    /// Start from `initial` and fetch pages with `fetcher`
    pub fn new(initial: Q, fetcher: F) -> Self {
        Self {
            next_query: Some(initial),
            in_flight: None,
            fetcher,
            current_fetch: None,
            cancel: None,
            pending_error: None,
            pages_fetched: 0,
            done: false,
            _item: PhantomData,
        }
    }

    /// Stop with [`Error::Cancelled`] once `token` fires
    #[must_use]
    pub fn with_cancel(mut self, token: Option<CancellationToken>) -> Self {
        self.cancel = token;
        self
    }

    /// Number of page requests issued so far
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }
}

impl<T, Q, F, Fut> Stream for Pages<T, Q, F, Fut>
where
    Q: ListQuery,
    F: FnMut(Q) -> Fut,
    Fut: Future<Output = Result<PageEnvelope<T>>>,
{
    type Item = Result<PageEnvelope<T>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if let Some(err) = this.pending_error.take() {
            return Poll::Ready(Some(Err(err)));
        }

        if *this.done {
            return Poll::Ready(None);
        }

        if this.current_fetch.is_none() {
            let Some(query) = this.next_query.take() else {
                *this.done = true;
                return Poll::Ready(None);
            };

            if let Err(err) = cancel::check(this.cancel.as_ref()) {
                *this.done = true;
                return Poll::Ready(Some(Err(err)));
            }

            *this.pages_fetched += 1;
            debug!("Requesting page {}", this.pages_fetched);
            let fut = (this.fetcher)(query.clone());
            *this.in_flight = Some(query);
            this.current_fetch.set(Some(fut));
        }

        let Some(fut) = this.current_fetch.as_mut().as_pin_mut() else {
            return Poll::Ready(None);
        };

        match fut.poll(cx) {
            Poll::Ready(Ok(page)) => {
                this.current_fetch.set(None);
                let Some(query) = this.in_flight.take() else {
                    *this.done = true;
                    return Poll::Ready(Some(Ok(page)));
                };

                match next_query(&query, &page) {
                    Ok(NextPage::Continue(next)) => *this.next_query = Some(next),
                    Ok(NextPage::Done) => {
                        debug!("Pagination finished after {} pages", this.pages_fetched);
                        *this.done = true;
                    }
                    Err(e) => {
                        *this.done = true;
                        *this.pending_error = Some(e);
                    }
                }

                Poll::Ready(Some(Ok(page)))
            }
            Poll::Ready(Err(e)) => {
                this.current_fetch.set(None);
                this.in_flight.take();
                *this.done = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

pin_project! {
    /// Stream of items across all pages
    ///
    /// ```rust,ignore
    /// let mut records = Paginator::new(filters, |q| async move {
    ///     client.dns_records_page(&q).await
    /// });
    /// while let Some(record) = records.try_next().await? {
    ///     println!("{}", record.name);
    /// }
    /// ```
    pub struct Paginator<T, Q, F, Fut>
    where
        Q: ListQuery,
        F: FnMut(Q) -> Fut,
        Fut: Future<Output = Result<PageEnvelope<T>>>,
    {
        #[pin]
        pages: Pages<T, Q, F, Fut>,
        buffer: VecDeque<T>,
    }
}

impl<T, Q, F, Fut> Paginator<T, Q, F, Fut>
where
    Q: ListQuery,
    F: FnMut(Q) -> Fut,
    Fut: Future<Output = Result<PageEnvelope<T>>>,
{
    /// Start from `initial` and fetch pages with `fetcher`
    pub fn new(initial: Q, fetcher: F) -> Self {
        Self {
            pages: Pages::new(initial, fetcher),
            buffer: VecDeque::new(),
        }
    }

    /// Stop with [`Error::Cancelled`] once `token` fires
    #[must_use]
    pub fn with_cancel(self, token: Option<CancellationToken>) -> Self {
        Self {
            pages: self.pages.with_cancel(token),
            buffer: self.buffer,
        }
    }

    /// Yield whole pages instead of items
    pub fn pages(self) -> Pages<T, Q, F, Fut> {
        self.pages
    }

    /// Number of page requests issued so far
    pub fn pages_fetched(&self) -> u32 {
        self.pages.pages_fetched()
    }

    /// Drain every page into a vector, stopping at the first error
    pub async fn collect_all(self) -> Result<Vec<T>> {
        self.try_collect().await
    }
}

impl<T, Q, F, Fut> Stream for Paginator<T, Q, F, Fut>
where
    Q: ListQuery,
    F: FnMut(Q) -> Fut,
    Fut: Future<Output = Result<PageEnvelope<T>>>,
{
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(item) = this.buffer.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            match this.pages.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(page))) => this.buffer.extend(page.items),
                Poll::Ready(Some(Err(e))) => return Poll::Ready(Some(Err(e))),
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
