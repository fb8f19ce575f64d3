//! In-memory pagination over fully-fetched collections.
//!
//! Every panel fetches its whole collection and pages through it locally
//! with a fixed page size, so the window arithmetic lives here once
//! instead of being repeated per screen.

/// Page size shared by the admin and supplier panels.
pub const PANEL_PAGE_SIZE: usize = 5;

/// A resolved page window over a collection of known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Current page, 1-based, clamped into range.
    pub current: usize,
    /// Total number of pages; at least 1 even for an empty collection.
    pub total_pages: usize,
    /// Number of items in the underlying collection.
    pub total_items: usize,
    /// Items per page.
    pub per_page: usize,
}

impl Page {
    /// Resolve a requested page against a collection of `total_items`.
    ///
    /// Requests below 1 clamp to the first page and requests past the end
    /// clamp to the last page, so a stale page link after a delete still
    /// renders something sensible.
    ///
    /// # Panics
    ///
    /// Panics if `per_page` is zero.
    #[must_use]
    pub fn resolve(total_items: usize, per_page: usize, requested: usize) -> Self {
        assert!(per_page > 0, "per_page must be positive");
        let total_pages = total_items.div_ceil(per_page).max(1);
        let current = requested.clamp(1, total_pages);
        Self {
            current,
            total_pages,
            total_items,
            per_page,
        }
    }

    /// The half-open index range `[start, end)` of this page.
    #[must_use]
    pub const fn bounds(&self) -> (usize, usize) {
        let start = (self.current - 1) * self.per_page;
        let mut end = start + self.per_page;
        if end > self.total_items {
            end = self.total_items;
        }
        (start, end)
    }

    /// Slice `items` down to this page's window.
    #[must_use]
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let (start, end) = self.bounds();
        items.get(start..end).unwrap_or_default()
    }

    /// Page numbers for the pagination control, `1..=total_pages`.
    #[must_use]
    pub fn numbers(&self) -> Vec<usize> {
        (1..=self.total_pages).collect()
    }

    /// Whether a pagination control is worth rendering at all.
    #[must_use]
    pub const fn is_paged(&self) -> bool {
        self.total_pages > 1
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_is_ceil_of_items_over_size() {
        assert_eq!(Page::resolve(0, 5, 1).total_pages, 1);
        assert_eq!(Page::resolve(5, 5, 1).total_pages, 1);
        assert_eq!(Page::resolve(6, 5, 1).total_pages, 2);
        assert_eq!(Page::resolve(23, 5, 1).total_pages, 5);
    }

    #[test]
    fn test_page_window_bounds() {
        // Page p displays items [5(p-1), 5p).
        let items: Vec<usize> = (0..23).collect();

        let page = Page::resolve(items.len(), 5, 1);
        assert_eq!(page.window(&items), &[0, 1, 2, 3, 4]);

        let page = Page::resolve(items.len(), 5, 3);
        assert_eq!(page.window(&items), &[10, 11, 12, 13, 14]);

        let page = Page::resolve(items.len(), 5, 5);
        assert_eq!(page.window(&items), &[20, 21, 22]);
    }

    #[test]
    fn test_requested_page_is_clamped() {
        let page = Page::resolve(12, 5, 99);
        assert_eq!(page.current, 3);

        let page = Page::resolve(12, 5, 0);
        assert_eq!(page.current, 1);
    }

    #[test]
    fn test_numbers_enumerate_every_page() {
        let page = Page::resolve(11, 5, 2);
        assert_eq!(page.numbers(), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_collection_renders_one_empty_page() {
        let items: Vec<usize> = Vec::new();
        let page = Page::resolve(0, PANEL_PAGE_SIZE, 1);
        assert_eq!(page.window(&items), &[] as &[usize]);
        assert!(!page.is_paged());
    }
}
