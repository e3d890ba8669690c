//! Cursor-driven pagination over list endpoints.
//!
//! Listings take a cursor (`start` or `offset`) and a page size. A page source
//! is called with the current cursor; a page with no items ends the sequence,
//! otherwise the page is yielded and the cursor advances by the page size.
//! The server-reported totals are never consulted, so the terminating empty
//! page is always fetched.

use crate::Result;
use futures::stream::{self, Stream, TryStreamExt};
use std::future::Future;

/// A response that carries one page of items.
pub trait Page {
    type Item;

    fn items(&self) -> &[Self::Item];

    fn into_items(self) -> Vec<Self::Item>;

    fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

/// Lazily fetches pages starting at `start`, `limit` items apart.
///
/// ```
/// use dateno::models::StatsPage;
/// use dateno::pagination::pages;
/// use futures::TryStreamExt;
///
/// # async fn example() -> dateno::Result<()> {
/// let all: Vec<StatsPage<u32>> = pages(0, 2, |cursor| async move {
///     let items = if cursor < 4 { vec![cursor as u32, cursor as u32 + 1] } else { vec![] };
///     Ok(StatsPage { items, totals: None, extra: Default::default() })
/// })
/// .try_collect()
/// .await?;
///
/// assert_eq!(all.len(), 2);
/// # Ok(())
/// # }
/// ```
pub fn pages<P, F, Fut>(start: u64, limit: u64, fetch: F) -> impl Stream<Item = Result<P>>
where
    P: Page,
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<P>>,
{
    stream::try_unfold((start, fetch), move |(cursor, mut fetch)| async move {
        let page = fetch(cursor).await?;
        if page.is_empty() {
            tracing::debug!(cursor = cursor, "Reached empty page");
            return Ok(None);
        }
        Ok(Some((page, (cursor + limit, fetch))))
    })
}

/// Flattens a stream of pages into a stream of items.
pub fn items<P, S>(pages: S) -> impl Stream<Item = Result<P::Item>>
where
    P: Page,
    S: Stream<Item = Result<P>>,
{
    pages
        .map_ok(|page| stream::iter(page.into_items().into_iter().map(Ok)))
        .try_flatten()
}

/// Blocking counterpart of [`pages`].
pub struct PageIter<P, F> {
    cursor: u64,
    limit: u64,
    fetch: F,
    done: bool,
    _page: std::marker::PhantomData<fn() -> P>,
}

impl<P, F> PageIter<P, F>
where
    P: Page,
    F: FnMut(u64) -> Result<P>,
{
    pub fn new(start: u64, limit: u64, fetch: F) -> Self {
        Self {
            cursor: start,
            limit,
            fetch,
            done: false,
            _page: std::marker::PhantomData,
        }
    }
}

impl<P, F> Iterator for PageIter<P, F>
where
    P: Page,
    F: FnMut(u64) -> Result<P>,
{
    type Item = Result<P>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match (self.fetch)(self.cursor) {
            Ok(page) if page.is_empty() => {
                self.done = true;
                None
            }
            Ok(page) => {
                self.cursor += self.limit;
                Some(Ok(page))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Blocking counterpart of [`items`].
pub fn flatten_items<P, I>(pages: I) -> impl Iterator<Item = Result<P::Item>>
where
    P: Page,
    I: Iterator<Item = Result<P>>,
{
    pages.flat_map(|page| match page {
        Ok(page) => page.into_items().into_iter().map(Ok).collect::<Vec<_>>(),
        Err(e) => vec![Err(e)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatsPage;
    use crate::Error;
    use std::sync::{Arc, Mutex};

    fn page(items: Vec<u64>) -> StatsPage<u64> {
        StatsPage {
            items,
            totals: None,
            extra: Default::default(),
        }
    }

    /// Five items served two at a time.
    fn serve(cursor: u64, limit: u64) -> StatsPage<u64> {
        page((cursor..(cursor + limit).min(5)).collect())
    }

    #[tokio::test]
    async fn stream_stops_after_empty_page() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = calls.clone();

        let got: Vec<u64> = items(pages(0, 2, move |cursor| {
            seen.lock().unwrap().push(cursor);
            async move { Ok(serve(cursor, 2)) }
        }))
        .try_collect()
        .await
        .unwrap();

        assert_eq!(got, vec![0, 1, 2, 3, 4]);
        assert_eq!(*calls.lock().unwrap(), vec![0, 2, 4, 6]);
    }

    #[tokio::test]
    async fn stream_surfaces_errors() {
        let result: Result<Vec<StatsPage<u64>>> = pages(0, 2, |cursor| async move {
            if cursor == 0 {
                Ok(serve(cursor, 2))
            } else {
                Err(Error::Timeout)
            }
        })
        .try_collect()
        .await;

        assert!(matches!(result, Err(Error::Timeout)));
    }

    #[test]
    fn iterator_matches_stream_sequence() {
        let mut calls = Vec::new();
        let got: Vec<u64> = flatten_items(PageIter::new(0, 2, |cursor| {
            calls.push(cursor);
            Ok(serve(cursor, 2))
        }))
        .collect::<Result<_>>()
        .unwrap();

        assert_eq!(got, vec![0, 1, 2, 3, 4]);
        assert_eq!(calls, vec![0, 2, 4, 6]);
    }

    #[test]
    fn iterator_stops_after_error() {
        let mut iter = PageIter::new(0, 2, |_| Err::<StatsPage<u64>, _>(Error::Timeout));
        assert!(matches!(iter.next(), Some(Err(Error::Timeout))));
        assert!(iter.next().is_none());
    }
}
