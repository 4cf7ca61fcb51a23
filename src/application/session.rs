//! Async glue between a [`ListingSource`] and a [`ListingView`].

use tokio::sync::Mutex;
use tracing::instrument;

use crate::application::{
    listing::{ApplyOutcome, ListingSnapshot, ListingView},
    repos::{ListingQuery, ListingSource},
};

/// Drives one listing view from a source.
///
/// The view lock is held only to issue a ticket and to apply a response, never while a
/// fetch is in flight, so overlapping fetches race freely and the sequencers decide.
pub struct ListingSession<S> {
    source: S,
    view: Mutex<ListingView>,
    query: ListingQuery,
}

impl<S: ListingSource> ListingSession<S> {
    /// Records are read from the view variant's feed unless [`Self::with_query`] says
    /// otherwise.
    pub fn new(source: S, view: ListingView) -> Self {
        let query = ListingQuery::feed(view.variant().feed());
        Self {
            source,
            view: Mutex::new(view),
            query,
        }
    }

    /// Use `query` for every records fetch that does not pass its own.
    pub fn with_query(mut self, query: ListingQuery) -> Self {
        self.query = query;
        self
    }

    pub async fn load_records(&self) -> ApplyOutcome {
        self.load_records_with(self.query).await
    }

    #[instrument(skip(self), fields(page = ?query.page_number))]
    pub async fn load_records_with(&self, query: ListingQuery) -> ApplyOutcome {
        let ticket = self.view.lock().await.begin_records_fetch();
        let response = self.source.fetch_listing(&query).await;
        self.view.lock().await.apply_records(ticket, response)
    }

    #[instrument(skip(self))]
    pub async fn load_categories(&self) -> ApplyOutcome {
        let ticket = self.view.lock().await.begin_categories_fetch();
        let response = self.source.fetch_categories().await;
        self.view.lock().await.apply_categories(ticket, response)
    }

    /// Fetch records and categories concurrently.
    pub async fn refresh(&self) -> (ApplyOutcome, ApplyOutcome) {
        tokio::join!(self.load_records(), self.load_categories())
    }

    /// Run a filter or page change against the view.
    pub async fn update<R>(&self, change: impl FnOnce(&mut ListingView) -> R) -> R {
        let mut view = self.view.lock().await;
        change(&mut view)
    }

    pub async fn snapshot(&self) -> ListingSnapshot {
        self.view.lock().await.snapshot()
    }
}
