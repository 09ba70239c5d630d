//! Fixed-size pages over a filtered view.

mod links;

pub use links::{page_links, PageLink, MAX_VISIBLE_PAGES};

use std::ops::Range;

use serde::Serialize;

/// Number of pages needed for `len` items; never less than 1.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    len.div_ceil(page_size).max(1)
}

/// One page cut out of a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<'a, T> {
    /// 1-based page number actually served.
    pub page: usize,
    pub items: &'a [T],
    pub total_pages: usize,
}

/// Cut page `requested_page` out of `view`. Out-of-range requests are
/// clamped into `1..=total_pages`.
pub fn paginate<T>(view: &[T], page_size: usize, requested_page: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total = total_pages(view.len(), page_size);
    let page = requested_page.clamp(1, total);
    let range = page_range(page, page_size, view.len());
    Page {
        page,
        items: &view[range],
        total_pages: total,
    }
}

fn page_range(page: usize, page_size: usize, len: usize) -> Range<usize> {
    let start = ((page - 1) * page_size).min(len);
    let end = (start + page_size).min(len);
    start..end
}

/// Current page and page count of a view whose length changes over time.
///
/// Holds `1 <= current_page <= total_pages` at all times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    page_size: usize,
    current_page: usize,
    total_pages: usize,
    len: usize,
}

impl Pagination {
    /// A zero page size is treated as 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
            total_pages: 1,
            len: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Length of the view this state was last computed for.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Recompute for a view of `len` items, clamping the current page.
    pub fn recompute(&mut self, len: usize) {
        self.len = len;
        self.total_pages = total_pages(len, self.page_size);
        self.current_page = self.current_page.clamp(1, self.total_pages);
    }

    /// Change the page size and recompute.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.recompute(self.len);
    }

    /// Move to page `n`. Requests outside `1..=total_pages` are ignored;
    /// returns whether the page was accepted.
    pub fn go_to_page(&mut self, n: usize) -> bool {
        if n < 1 || n > self.total_pages {
            return false;
        }
        self.current_page = n;
        true
    }

    /// Item range of the current page within the view.
    pub fn range(&self) -> Range<usize> {
        page_range(self.current_page, self.page_size, self.len)
    }

    /// Page controls for the current state.
    pub fn links(&self) -> Vec<PageLink> {
        page_links(self.current_page, self.total_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 12), 1);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_fourteen_items_twelve_per_page() {
        let view: Vec<u32> = (0..14).collect();
        let first = paginate(&view, 12, 1);
        assert_eq!(first.page, 1);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.items.len(), 12);

        let second = paginate(&view, 12, 2);
        assert_eq!(second.items, &[12, 13]);
    }

    #[test]
    fn test_paginate_clamps_requested_page() {
        let view: Vec<u32> = (0..14).collect();
        assert_eq!(paginate(&view, 12, 0).page, 1);
        assert_eq!(paginate(&view, 12, 99).page, 2);
    }

    #[test]
    fn test_paginate_empty_view() {
        let view: Vec<u32> = Vec::new();
        let page = paginate(&view, 12, 3);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_pages_partition_the_view() {
        for len in 1..40usize {
            for page_size in 1..15usize {
                let view: Vec<usize> = (0..len).collect();
                let total = total_pages(len, page_size);
                let mut seen = Vec::new();
                for p in 1..=total {
                    seen.extend_from_slice(paginate(&view, page_size, p).items);
                }
                assert_eq!(seen, view, "len={} page_size={}", len, page_size);
            }
        }
    }

    #[test]
    fn test_go_to_page_guards_range() {
        let mut pagination = Pagination::new(12);
        pagination.recompute(30);
        assert_eq!(pagination.total_pages(), 3);

        assert!(pagination.go_to_page(2));
        assert!(!pagination.go_to_page(0));
        assert_eq!(pagination.current_page(), 2);
        assert!(!pagination.go_to_page(4));
        assert_eq!(pagination.current_page(), 2);
    }

    #[test]
    fn test_recompute_clamps_current_page() {
        let mut pagination = Pagination::new(10);
        pagination.recompute(50);
        pagination.go_to_page(5);

        pagination.recompute(25);
        assert_eq!(pagination.total_pages(), 3);
        assert_eq!(pagination.current_page(), 3);

        pagination.recompute(0);
        assert_eq!(pagination.total_pages(), 1);
        assert_eq!(pagination.current_page(), 1);
        assert_eq!(pagination.range(), 0..0);
    }

    #[test]
    fn test_recompute_keeps_page_when_still_valid() {
        let mut pagination = Pagination::new(10);
        pagination.recompute(50);
        pagination.go_to_page(2);
        pagination.recompute(45);
        assert_eq!(pagination.current_page(), 2);
        assert_eq!(pagination.range(), 10..20);
    }

    #[test]
    fn test_set_page_size_recomputes() {
        let mut pagination = Pagination::new(5);
        pagination.recompute(20);
        pagination.go_to_page(4);

        pagination.set_page_size(10);
        assert_eq!(pagination.total_pages(), 2);
        assert_eq!(pagination.current_page(), 2);
        assert_eq!(pagination.range(), 10..20);
    }

    #[test]
    fn test_range_of_last_partial_page() {
        let mut pagination = Pagination::new(12);
        pagination.recompute(14);
        pagination.go_to_page(2);
        assert_eq!(pagination.range(), 12..14);
    }
}
