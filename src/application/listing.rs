//! Listing view orchestration: fetch results in, one recomputed page out.
//!
//! A [`ListingView`] owns everything one listing surface needs. Every change goes through
//! [`ListingView::recompute`], which re-derives the page from the current records, filters
//! and categories. Responses are gated by per-stream [`RequestSequencer`]s so that a slow,
//! superseded fetch can never overwrite a newer one.

use std::{fmt, num::NonZeroUsize, str::FromStr, sync::Arc};

use metrics::counter;
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::{
    categories::{CategoryOption, CategoryOptionValue, CategoryResolver},
    error::{FailureKind, ListingError},
    filter::{CategorySelection, FilterEngine, FilterState},
    normalize::{Audience, RecordNormalizer},
    pagination::{PageEvent, PageLink, PageState, Paginator},
    repos::{ListingFeed, SourceError},
    sequence::{RequestSequencer, RequestTicket},
};
use crate::domain::entities::{AdoptionRecord, Category};

pub(crate) const METRIC_STALE_RESPONSES: &str = "bonchan_listing_stale_response_total";
pub(crate) const METRIC_FETCH_FAILURES: &str = "bonchan_listing_fetch_failure_total";

/// How a listing surface expresses its category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryStrategy {
    /// Select by category id, resolved through the fetched categories.
    Id,
    /// Select by category label, compared directly.
    Name,
}

/// The listing surfaces the pipeline serves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingVariant {
    #[default]
    HomeCarousel,
    Gallery,
    StaffTable,
}

impl ListingVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            ListingVariant::HomeCarousel => "carousel",
            ListingVariant::Gallery => "gallery",
            ListingVariant::StaffTable => "staff",
        }
    }

    pub fn default_page_size(self) -> NonZeroUsize {
        match self {
            ListingVariant::HomeCarousel => NonZeroUsize::new(3),
            ListingVariant::Gallery => NonZeroUsize::new(6),
            ListingVariant::StaffTable => NonZeroUsize::new(5),
        }
        .unwrap_or(NonZeroUsize::MIN)
    }

    pub fn audience(self) -> Audience {
        match self {
            ListingVariant::StaffTable => Audience::Staff,
            ListingVariant::HomeCarousel | ListingVariant::Gallery => Audience::Public,
        }
    }

    /// Staff tables read the bare pet collection; the public surfaces read posts.
    pub fn feed(self) -> ListingFeed {
        match self {
            ListingVariant::StaffTable => ListingFeed::Pets,
            ListingVariant::HomeCarousel | ListingVariant::Gallery => ListingFeed::Posts,
        }
    }

    pub fn category_strategy(self) -> CategoryStrategy {
        match self {
            ListingVariant::HomeCarousel => CategoryStrategy::Id,
            ListingVariant::Gallery | ListingVariant::StaffTable => CategoryStrategy::Name,
        }
    }
}

impl fmt::Display for ListingVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingVariant {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "carousel" | "home" => Ok(ListingVariant::HomeCarousel),
            "gallery" => Ok(ListingVariant::Gallery),
            "staff" => Ok(ListingVariant::StaffTable),
            other => Err(format!(
                "unknown listing view `{other}` (expected carousel, gallery or staff)"
            )),
        }
    }
}

/// What the render surface should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus {
    Loading,
    Failed(FailureKind),
    NoMatches,
    Ready,
}

impl ListingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ListingStatus::Loading => "loading",
            ListingStatus::Failed(_) => "failed",
            ListingStatus::NoMatches => "no_matches",
            ListingStatus::Ready => "ready",
        }
    }
}

/// Events that re-derive the visible page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    RecordsLoaded,
    CategoriesLoaded,
    FilterChanged,
    PageChanged(PageEvent),
}

/// Result of handing a fetch response to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Loading,
    Loaded,
    Failed(FailureKind),
}

/// Everything the render surface needs for one frame.
#[derive(Debug, Clone)]
pub struct ListingSnapshot {
    pub variant: ListingVariant,
    pub status: ListingStatus,
    pub page: PageState,
    pub window: Vec<PageLink>,
    pub records: Vec<Arc<AdoptionRecord>>,
    pub total_matches: usize,
    pub filters: FilterState,
    pub category_options: Vec<CategoryOption>,
}

/// Filter, category and page state for one listing surface.
#[derive(Debug)]
pub struct ListingView {
    variant: ListingVariant,
    normalizer: RecordNormalizer,
    filters: FilterState,
    categories: CategoryResolver,
    records: Vec<Arc<AdoptionRecord>>,
    pager: Paginator<Arc<AdoptionRecord>>,
    load: LoadState,
    records_seq: RequestSequencer,
    categories_seq: RequestSequencer,
}

impl ListingView {
    pub fn new(variant: ListingVariant) -> Self {
        Self::with_page_size(variant, variant.default_page_size())
    }

    pub fn with_page_size(variant: ListingVariant, page_size: NonZeroUsize) -> Self {
        Self {
            variant,
            normalizer: RecordNormalizer::new(variant.audience()),
            filters: FilterState::default(),
            categories: CategoryResolver::default(),
            records: Vec::new(),
            pager: Paginator::new(page_size),
            load: LoadState::Loading,
            records_seq: RequestSequencer::default(),
            categories_seq: RequestSequencer::default(),
        }
    }

    pub fn variant(&self) -> ListingVariant {
        self.variant
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn categories(&self) -> &CategoryResolver {
        &self.categories
    }

    /// Every normalized record, before filtering.
    pub fn records(&self) -> &[Arc<AdoptionRecord>] {
        &self.records
    }

    /// Records of the current page.
    pub fn current_page_records(&self) -> &[Arc<AdoptionRecord>] {
        self.pager.current_slice()
    }

    pub fn page_state(&self) -> PageState {
        self.pager.state()
    }

    pub fn status(&self) -> ListingStatus {
        match self.load {
            LoadState::Loading => ListingStatus::Loading,
            LoadState::Failed(kind) => ListingStatus::Failed(kind),
            LoadState::Loaded if self.pager.is_empty() => ListingStatus::NoMatches,
            LoadState::Loaded => ListingStatus::Ready,
        }
    }

    /// Issue a ticket for a new records fetch. Any earlier records fetch becomes stale.
    pub fn begin_records_fetch(&mut self) -> RequestTicket {
        let ticket = self.records_seq.issue();
        self.load = LoadState::Loading;
        debug!(ticket = %ticket, variant = %self.variant, "records fetch issued");
        ticket
    }

    /// Issue a ticket for a new categories fetch.
    pub fn begin_categories_fetch(&mut self) -> RequestTicket {
        let ticket = self.categories_seq.issue();
        debug!(ticket = %ticket, variant = %self.variant, "categories fetch issued");
        ticket
    }

    /// Apply a records response, unless a newer records fetch has been issued since.
    pub fn apply_records(
        &mut self,
        ticket: RequestTicket,
        response: Result<Value, SourceError>,
    ) -> ApplyOutcome {
        if !self.records_seq.is_latest(ticket) {
            discard_stale("records", ticket, self.records_seq.latest());
            return ApplyOutcome::Discarded;
        }

        let normalized = response
            .map_err(ListingError::from)
            .and_then(|body| self.normalizer.normalize(&body).map_err(ListingError::from));
        match normalized {
            Ok(records) => {
                self.records = records;
                self.load = LoadState::Loaded;
            }
            Err(err) => {
                let kind = err.kind();
                warn!(
                    ticket = %ticket,
                    kind = kind.as_str(),
                    error = %err,
                    "records fetch failed"
                );
                counter!(METRIC_FETCH_FAILURES, "stream" => "records").increment(1);
                self.records.clear();
                self.load = LoadState::Failed(kind);
            }
        }
        self.recompute(Trigger::RecordsLoaded);
        ApplyOutcome::Applied
    }

    /// Apply a categories response. A failed fetch keeps the previous categories.
    pub fn apply_categories(
        &mut self,
        ticket: RequestTicket,
        response: Result<Vec<Category>, SourceError>,
    ) -> ApplyOutcome {
        if !self.categories_seq.is_latest(ticket) {
            discard_stale("categories", ticket, self.categories_seq.latest());
            return ApplyOutcome::Discarded;
        }

        match response {
            Ok(categories) => {
                self.categories = CategoryResolver::new(categories);
                self.recompute(Trigger::CategoriesLoaded);
            }
            Err(err) => {
                warn!(
                    ticket = %ticket,
                    error = %err,
                    "categories fetch failed; keeping previous categories"
                );
                counter!(METRIC_FETCH_FAILURES, "stream" => "categories").increment(1);
            }
        }
        ApplyOutcome::Applied
    }

    /// Re-derive the visible page.
    ///
    /// A page change only moves within the current filtered sequence. Every other trigger
    /// refilters from the full record set, which puts the view back on page 1.
    pub fn recompute(&mut self, trigger: Trigger) {
        match trigger {
            Trigger::PageChanged(event) => {
                self.pager.handle(event);
            }
            Trigger::RecordsLoaded | Trigger::CategoriesLoaded | Trigger::FilterChanged => {
                if trigger == Trigger::CategoriesLoaded {
                    self.settle_pending_category();
                }
                let filtered = FilterEngine::apply(&self.records, &self.filters, &self.categories);
                self.pager.reset(filtered);
            }
        }

        let page = self.pager.state();
        debug!(
            ?trigger,
            matches = self.pager.len(),
            page = page.current_page,
            total_pages = page.total_pages,
            status = self.status().as_str(),
            "listing recomputed"
        );
    }

    pub fn set_filter(&mut self, filters: FilterState) {
        self.filters = filters;
        self.recompute(Trigger::FilterChanged);
    }

    pub fn update_filter(&mut self, update: impl FnOnce(&mut FilterState)) {
        update(&mut self.filters);
        self.recompute(Trigger::FilterChanged);
    }

    /// Reset every filter to "all" without refetching.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.recompute(Trigger::FilterChanged);
    }

    /// Translate a selector option into this surface's category filter.
    ///
    /// Name-based surfaces need the label. An id the resolver does not know yet becomes
    /// [`CategorySelection::PendingName`], which selects nothing until a categories load
    /// supplies its label.
    pub fn category_selection(&self, value: CategoryOptionValue) -> CategorySelection {
        match (value, self.variant.category_strategy()) {
            (CategoryOptionValue::All, _) => CategorySelection::All,
            (CategoryOptionValue::Id(id), CategoryStrategy::Id) => CategorySelection::Id(id),
            (CategoryOptionValue::Id(id), CategoryStrategy::Name) => {
                match self.categories.name_for_id(id) {
                    Some(name) => CategorySelection::Name(name.to_string()),
                    None => CategorySelection::PendingName(id),
                }
            }
        }
    }

    fn settle_pending_category(&mut self) {
        let CategorySelection::PendingName(id) = self.filters.category else {
            return;
        };
        match self.categories.name_for_id(id) {
            Some(name) => {
                debug!(category_id = id, category = name, "pending category resolved to label");
                self.filters.category = CategorySelection::Name(name.to_string());
            }
            None => debug!(category_id = id, "pending category still unknown"),
        }
    }

    pub fn select_category(&mut self, value: CategoryOptionValue) {
        let selection = self.category_selection(value);
        self.update_filter(|filters| filters.category = selection);
    }

    pub fn next_page(&mut self) -> usize {
        self.recompute(Trigger::PageChanged(PageEvent::Next));
        self.pager.current_page()
    }

    pub fn previous_page(&mut self) -> usize {
        self.recompute(Trigger::PageChanged(PageEvent::Previous));
        self.pager.current_page()
    }

    pub fn go_to(&mut self, page: usize) -> usize {
        self.recompute(Trigger::PageChanged(PageEvent::GoTo(page)));
        self.pager.current_page()
    }

    pub fn snapshot(&self) -> ListingSnapshot {
        ListingSnapshot {
            variant: self.variant,
            status: self.status(),
            page: self.pager.state(),
            window: self.pager.page_window(),
            records: self.pager.current_slice().to_vec(),
            total_matches: self.pager.len(),
            filters: self.filters.clone(),
            category_options: self.categories.selector_options(),
        }
    }
}

fn discard_stale(stream: &'static str, ticket: RequestTicket, latest: Option<RequestTicket>) {
    debug!(
        stream,
        ticket = %ticket,
        latest = ?latest,
        "discarding stale response"
    );
    counter!(METRIC_STALE_RESPONSES, "stream" => stream).increment(1);
}
