//! Offset pagination over an in-memory filtered sequence.

use std::num::NonZeroUsize;

use serde::Serialize;

/// Maximum number of numbered links shown by [`Paginator::page_window`].
pub const PAGE_WINDOW_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    pub current_page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

/// One entry of a numbered pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageLink {
    Page { number: usize, current: bool },
    Ellipsis,
}

/// Pagination input coming from the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    Previous,
    Next,
    GoTo(usize),
}

/// Fixed-size pages over a sequence, with a 1-based current page.
///
/// The sequence can only be replaced through [`Paginator::reset`], which always returns to
/// page 1, so `1 <= current_page <= total_pages` holds after every operation.
#[derive(Debug, Clone)]
pub struct Paginator<T> {
    items: Vec<T>,
    page_size: NonZeroUsize,
    current_page: usize,
}

impl<T> Paginator<T> {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self::with_items(Vec::new(), page_size)
    }

    pub fn with_items(items: Vec<T>, page_size: NonZeroUsize) -> Self {
        Self {
            items,
            page_size,
            current_page: 1,
        }
    }

    /// Replace the paged sequence and return to the first page.
    pub fn reset(&mut self, items: Vec<T>) {
        self.items = items;
        self.current_page = 1;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// `ceil(len / page_size)`, never less than one.
    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.page_size.get()).max(1)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Records of page `page` (1-based). Out-of-range pages yield an empty slice.
    pub fn page_slice(&self, page: usize) -> &[T] {
        let Some(index) = page.checked_sub(1) else {
            return &[];
        };
        let size = self.page_size.get();
        let start = index.saturating_mul(size);
        if start >= self.items.len() {
            return &[];
        }
        let end = start.saturating_add(size).min(self.items.len());
        &self.items[start..end]
    }

    pub fn current_slice(&self) -> &[T] {
        self.page_slice(self.current_page)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Jump to `page`, clamped into `[1, total_pages]`. Returns the page landed on.
    pub fn go_to(&mut self, page: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages());
        self.current_page
    }

    /// Advance one page; a no-op on the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Go back one page; a no-op on the first page.
    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Apply a pagination event, returning whether the current page changed.
    pub fn handle(&mut self, event: PageEvent) -> bool {
        match event {
            PageEvent::Previous => self.previous_page(),
            PageEvent::Next => self.next_page(),
            PageEvent::GoTo(page) => {
                let before = self.current_page;
                self.go_to(page) != before
            }
        }
    }

    pub fn state(&self) -> PageState {
        PageState {
            current_page: self.current_page,
            page_size: self.page_size.get(),
            total_pages: self.total_pages(),
        }
    }

    /// Numbered links for the pagination control.
    ///
    /// Up to [`PAGE_WINDOW_SIZE`] pages are listed outright. Longer runs keep the first and
    /// last page plus the neighbours of the current one, widened to four pages near either
    /// end, with ellipses over the gaps.
    pub fn page_window(&self) -> Vec<PageLink> {
        let total = self.total_pages();
        let current = self.current_page;
        let link = |number: usize| PageLink::Page {
            number,
            current: number == current,
        };

        if total <= PAGE_WINDOW_SIZE {
            return (1..=total).map(link).collect();
        }

        let mut start = current.saturating_sub(1).max(2);
        let mut end = (current + 1).min(total - 1);
        if current <= 3 {
            end = 4;
        }
        if current >= total - 2 {
            start = total - 3;
        }

        let mut links = Vec::with_capacity(PAGE_WINDOW_SIZE + 2);
        links.push(link(1));
        if start > 2 {
            links.push(PageLink::Ellipsis);
        }
        links.extend((start..=end).map(link));
        if end < total - 1 {
            links.push(PageLink::Ellipsis);
        }
        links.push(link(total));
        links
    }
}
