use serde::Serialize;

/// Numbered pages shown at once in the page control.
pub const MAX_VISIBLE_PAGES: usize = 5;

/// One element of the page control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageLink {
    Prev { target: usize, enabled: bool },
    Page { number: usize, current: bool },
    Ellipsis,
    Next { target: usize, enabled: bool },
}

/// Page control for `current` of `total` pages.
///
/// Empty when there is a single page. Otherwise a window of up to
/// [`MAX_VISIBLE_PAGES`] pages around `current`, with the first/last page
/// pinned outside the window and an ellipsis where pages are skipped.
pub fn page_links(current: usize, total: usize) -> Vec<PageLink> {
    if total <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total);

    let mut start = current.saturating_sub(MAX_VISIBLE_PAGES / 2).max(1);
    let end = (start + MAX_VISIBLE_PAGES - 1).min(total);
    if end + 1 - start < MAX_VISIBLE_PAGES {
        start = (end + 1).saturating_sub(MAX_VISIBLE_PAGES).max(1);
    }

    let mut links = vec![PageLink::Prev {
        target: current.saturating_sub(1).max(1),
        enabled: current > 1,
    }];

    if start > 1 {
        links.push(PageLink::Page {
            number: 1,
            current: false,
        });
        if start > 2 {
            links.push(PageLink::Ellipsis);
        }
    }

    for number in start..=end {
        links.push(PageLink::Page {
            number,
            current: number == current,
        });
    }

    if end < total {
        if end + 1 < total {
            links.push(PageLink::Ellipsis);
        }
        links.push(PageLink::Page {
            number: total,
            current: false,
        });
    }

    links.push(PageLink::Next {
        target: (current + 1).min(total),
        enabled: current < total,
    });
    links
}
