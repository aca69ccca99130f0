// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 15;

/// One page of a larger sequence. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    /// Slices `items` into the requested page. Page 0 is read as page 1 and a
    /// zero page size as 1; a page past the end comes back empty.
    pub fn of(items: Vec<T>, page: usize, per_page: usize) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total = items.len();
        let pages = page_count(total, per_page);
        let start = (page - 1).saturating_mul(per_page);

        let items = items
            .into_iter()
            .skip(start)
            .take(per_page)
            .collect::<Vec<_>>();

        Self {
            items,
            page,
            per_page,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn page_count(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1))
}

#[cfg(test)]
mod tests {
    use super::{Page, page_count};

    #[test]
    fn middle_page_has_both_neighbours() {
        let page = Page::of((1..=40).collect(), 2, 15);
        assert_eq!(page.items.first(), Some(&16));
        assert_eq!(page.items.len(), 15);
        assert_eq!(page.pages, 3);
        assert!(page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn last_page_is_partial() {
        let page = Page::of((1..=40).collect(), 3, 15);
        assert_eq!(page.items, (31..=40).collect::<Vec<_>>());
        assert!(!page.has_next);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = Page::of(vec!['a', 'b'], 9, 15);
        assert!(page.is_empty());
        assert_eq!(page.total, 2);
        assert_eq!(page.pages, 1);
    }

    #[test]
    fn zero_page_and_zero_size_are_clamped() {
        let page = Page::of(vec![1, 2, 3], 0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 1);
        assert_eq!(page.items, vec![1]);
        assert_eq!(page.pages, 3);
    }

    #[test]
    fn empty_input_has_no_pages() {
        assert_eq!(page_count(0, 15), 0);
        let page = Page::<u8>::of(Vec::new(), 1, 15);
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }
}
