//! Pagination
//!
//! Page arithmetic for the DataTable. Pages are 1-based.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    page_size: usize,
    total_items: usize,
}

impl Pagination {
    /// A page past the end is clamped to the last page
    pub fn new(current_page: usize, page_size: usize, total_items: usize) -> Self {
        let page_size = page_size.max(1);
        let mut pagination = Self {
            current_page,
            page_size,
            total_items,
        };
        pagination.current_page = current_page.clamp(1, pagination.total_pages());
        pagination
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Never zero; an empty table has one empty page
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size).max(1)
    }

    pub fn can_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Row indices on the current page
    pub fn range(&self) -> Range<usize> {
        let start = (self.current_page - 1) * self.page_size;
        start.min(self.total_items)..(start + self.page_size).min(self.total_items)
    }

    /// "2 / 5"
    pub fn label(&self) -> String {
        format!("{} / {}", self.current_page, self.total_pages())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        let p = Pagination::new(2, 10, 25);
        assert_eq!(p.total_pages(), 3);
        assert_eq!(p.range(), 10..20);
        assert!(p.can_prev() && p.can_next());
        assert_eq!(Pagination::new(3, 10, 25).range(), 20..25);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(Pagination::new(9, 10, 25).current_page(), 3);
        assert_eq!(Pagination::new(0, 10, 25).current_page(), 1);
        let empty = Pagination::new(1, 10, 0);
        assert_eq!(empty.total_pages(), 1);
        assert_eq!(empty.range(), 0..0);
        assert!(!empty.can_next());
        assert_eq!(empty.label(), "1 / 1");
    }
}
