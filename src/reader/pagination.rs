//! Mapping between global verse indices and fixed-size pages
//!
//! Pages are 1-based, verse indices are 0-based. A chapter with no verses
//! has zero pages.

use std::ops::Range;

/// Number of pages needed for `total` items
pub fn total_pages(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total.div_ceil(page_size)
}

/// Page (1-based) holding the item at `index`
pub fn page_of(index: usize, page_size: usize) -> usize {
    index / page_size.max(1) + 1
}

/// Index range of the items on `page`, clipped to `total`
pub fn page_bounds(page: usize, page_size: usize, total: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    start..end
}

/// Pagination state over the current chapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// Current page, 1-based (1 when there is no content)
    pub current_page: usize,
    /// Items per page, at least 1
    pub page_size: usize,
    /// Total number of items
    pub total: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self { current_page: 1, page_size: page_size.max(1), total: 0 }
    }

    /// Reset to the first page over a new item count, keeping the page size
    pub fn reset(&mut self, total: usize) {
        self.total = total;
        self.current_page = 1;
    }

    /// Change the page size; always returns to the first page
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total, self.page_size)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn can_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Move to the next page; no-op on the last page
    pub fn next_page(&mut self) -> bool {
        if self.can_next() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous page; no-op on the first page
    pub fn prev_page(&mut self) -> bool {
        if self.can_prev() {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Go to a page; no-op when out of range. Returns whether the page changed.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page == 0 || page > self.total_pages() || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Show the page holding `index`. Returns whether the page changed.
    pub fn reveal(&mut self, index: usize) -> bool {
        if index >= self.total {
            return false;
        }
        self.go_to(page_of(index, self.page_size))
    }

    /// Index range of the current page
    pub fn bounds(&self) -> Range<usize> {
        page_bounds(self.current_page, self.page_size, self.total)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.bounds().contains(&index)
    }

    /// e.g. `Page 2 of 3`
    pub fn summary(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn twenty_three_verses_by_ten() {
        assert_eq!(total_pages(23, 10), 3);
        assert_eq!(page_of(14, 10), 2);
        assert_eq!(page_bounds(3, 10, 23), 20..23);
    }

    #[test]
    fn empty_content_has_no_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(page_bounds(1, 10, 0), 0..0);

        let mut pagination = Pagination::new(10);
        pagination.reset(0);
        assert!(pagination.is_empty());
        assert!(!pagination.next_page());
        assert!(!pagination.prev_page());
    }

    #[test]
    fn navigating_past_the_ends_is_a_no_op() {
        let mut pagination = Pagination::new(10);
        pagination.reset(23);

        assert!(!pagination.prev_page());
        assert_eq!(pagination.current_page, 1);
        assert!(pagination.go_to(3));
        assert!(!pagination.next_page());
        assert_eq!(pagination.current_page, 3);
        assert!(!pagination.go_to(4));
        assert!(!pagination.go_to(0));
        assert_eq!(pagination.current_page, 3);
    }

    #[test]
    fn page_size_change_returns_to_first_page() {
        let mut pagination = Pagination::new(10);
        pagination.reset(23);
        pagination.go_to(2);

        pagination.set_page_size(5);
        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.total_pages(), 5);

        pagination.set_page_size(0);
        assert_eq!(pagination.page_size, 1);
    }

    #[test]
    fn reset_keeps_page_size() {
        let mut pagination = Pagination::new(7);
        pagination.reset(30);
        pagination.go_to(3);
        pagination.reset(8);
        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.page_size, 7);
        assert_eq!(pagination.summary(), "Page 1 of 2");
    }

    #[test]
    fn reveal_follows_index() {
        let mut pagination = Pagination::new(10);
        pagination.reset(23);
        assert!(pagination.reveal(21));
        assert_eq!(pagination.current_page, 3);
        assert!(!pagination.reveal(20));
        assert!(!pagination.reveal(23));
        assert!(pagination.contains(22));
    }

    proptest! {
        #[test]
        fn total_pages_is_ceiling(total in 0usize..5000, size in 1usize..200) {
            let expected = if total % size == 0 { total / size } else { total / size + 1 };
            prop_assert_eq!(total_pages(total, size), expected);
        }

        #[test]
        fn every_index_lands_on_a_valid_page(total in 1usize..2000, size in 1usize..100) {
            let pages = total_pages(total, size);
            for index in 0..total {
                let page = page_of(index, size);
                prop_assert!(page >= 1 && page <= pages);
                prop_assert!(page_bounds(page, size, total).contains(&index));
            }
        }

        #[test]
        fn pages_partition_the_items(total in 0usize..1000, size in 1usize..50) {
            let covered: usize =
                (1..=total_pages(total, size)).map(|p| page_bounds(p, size, total).len()).sum();
            prop_assert_eq!(covered, total);
        }
    }
}
