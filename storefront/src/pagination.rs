//! Pagination state.
//!
//! `current_page` never points past the last page once `total_pages` is
//! known.

use crate::constants::{DEFAULT_ITEMS_PER_PAGE, ITEMS_PER_PAGE_OPTIONS};

/// Page position and totals for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    /// 1-based page.
    pub current_page: u32,
    /// Pages available; 0 until the first load.
    pub total_pages: u32,
    /// Matching items.
    pub total_items: u64,
    /// Page size, one of [`ITEMS_PER_PAGE_OPTIONS`].
    pub items_per_page: u32,
}

impl PaginationState {
    /// Fresh state with the given page size (falls back to the default when
    /// not an allowed option).
    #[must_use]
    pub fn new(items_per_page: u32) -> Self {
        Self {
            items_per_page: if is_valid_items_per_page(items_per_page) {
                items_per_page
            } else {
                DEFAULT_ITEMS_PER_PAGE
            },
            ..Self::default()
        }
    }

    /// Page that a request for `page` resolves to: at least 1 and at most
    /// `total_pages` once totals are known.
    #[must_use]
    pub const fn clamp(&self, page: u32) -> u32 {
        if page < 1 {
            1
        } else if self.total_pages > 0 && page > self.total_pages {
            self.total_pages
        } else {
            page
        }
    }

    /// Move to `page`, clamped. Returns the page actually used.
    pub const fn set_page(&mut self, page: u32) -> u32 {
        self.current_page = self.clamp(page);
        self.current_page
    }

    /// Change the page size. Returns `false` (and changes nothing) for a
    /// size outside the allowed options.
    pub fn set_items_per_page(&mut self, count: u32) -> bool {
        if !is_valid_items_per_page(count) {
            return false;
        }
        self.items_per_page = count;
        true
    }

    /// Record totals from a loaded page.
    pub const fn apply_totals(&mut self, page: u32, total_pages: u32, total_items: u64) {
        self.current_page = if page < 1 { 1 } else { page };
        self.total_pages = total_pages;
        self.total_items = total_items;
    }

    /// Back to page 1 with zero totals; page size is kept.
    pub const fn reset(&mut self) {
        self.current_page = 1;
        self.total_pages = 0;
        self.total_items = 0;
    }

    /// Whether there is at least one page.
    #[must_use]
    pub const fn has_items(&self) -> bool {
        self.total_pages > 0
    }

    /// Whether there is more than one page.
    #[must_use]
    pub const fn has_pagination(&self) -> bool {
        self.total_pages > 1
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            total_items: 0,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

/// Whether `count` is an allowed page size.
#[must_use]
pub fn is_valid_items_per_page(count: u32) -> bool {
    ITEMS_PER_PAGE_OPTIONS.contains(&count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_past_last_page() {
        let mut pagination = PaginationState::default();
        pagination.apply_totals(1, 4, 40);
        assert_eq!(pagination.set_page(9), 4);
        assert_eq!(pagination.set_page(0), 1);
        assert_eq!(pagination.set_page(3), 3);
    }

    #[test]
    fn unknown_totals_do_not_clamp() {
        let mut pagination = PaginationState::default();
        assert_eq!(pagination.set_page(7), 7);
    }

    #[test]
    fn items_per_page_only_from_options() {
        let mut pagination = PaginationState::new(16);
        assert!(!pagination.set_items_per_page(15));
        assert_eq!(pagination.items_per_page, 16);
        assert!(pagination.set_items_per_page(8));
        assert_eq!(PaginationState::new(99).items_per_page, 12);
    }

    #[test]
    fn reset_keeps_page_size() {
        let mut pagination = PaginationState::new(20);
        pagination.apply_totals(3, 5, 97);
        pagination.reset();
        assert_eq!(pagination, PaginationState::new(20));
        assert!(!pagination.has_items());
        assert!(!pagination.has_pagination());
    }
}
