//! Fixed-size page window over the cart projection.

use serde::{Deserialize, Serialize};

use super::error::CartError;

/// Rows shown per cart page.
pub const ITEMS_PER_PAGE: usize = 4;

/// Number of pages needed for `count` rows. Zero rows means zero pages.
#[must_use]
pub const fn total_pages(count: usize) -> usize {
    count.div_ceil(ITEMS_PER_PAGE)
}

/// The shopper's current page.
///
/// Pages are 1-based. Page 0 only appears after clamping against an empty
/// cart and means "show the empty state".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    current_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { current_page: 1 }
    }
}

impl Pagination {
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// The rows of `items` on the current page.
    #[must_use]
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let Some(page_index) = self.current_page.checked_sub(1) else {
            return &[];
        };
        let start = page_index.saturating_mul(ITEMS_PER_PAGE);
        let end = start.saturating_add(ITEMS_PER_PAGE).min(items.len());
        items.get(start..end).unwrap_or(&[])
    }

    /// Advance one page if not on the last. Returns whether the page changed.
    pub const fn next(&mut self, total_pages: usize) -> bool {
        if self.current_page < total_pages {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page if not on the first. Returns whether the page changed.
    pub const fn prev(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page`. Returns whether the page changed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::PageOutOfRange`] unless `1 <= page <= total_pages`.
    pub fn go_to(&mut self, page: usize, total_pages: usize) -> Result<bool, CartError> {
        if page == 0 || page > total_pages {
            return Err(CartError::PageOutOfRange { page, total_pages });
        }
        if page == self.current_page {
            return Ok(false);
        }
        self.current_page = page;
        Ok(true)
    }

    /// `current = min(current, total_pages)`. Returns whether the page changed.
    pub fn clamp(&mut self, total_pages: usize) -> bool {
        let clamped = self.current_page.min(total_pages);
        let changed = clamped != self.current_page;
        self.current_page = clamped;
        changed
    }

    /// Leave the empty-state page 0 once rows exist again.
    pub const fn normalize(&mut self, total_pages: usize) -> bool {
        if self.current_page == 0 && total_pages > 0 {
            self.current_page = 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(page: usize) -> Pagination {
        Pagination { current_page: page }
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(4), 1);
        assert_eq!(total_pages(5), 2);
        assert_eq!(total_pages(8), 2);
        assert_eq!(total_pages(9), 3);
    }

    #[test]
    fn test_window_slices_current_page() {
        let rows: Vec<u32> = (1..=6).collect();
        assert_eq!(at(1).window(&rows), &[1, 2, 3, 4]);
        assert_eq!(at(2).window(&rows), &[5, 6]);
        assert!(at(3).window(&rows).is_empty());
        assert!(at(0).window(&rows).is_empty());
    }

    #[test]
    fn test_next_and_prev_respect_bounds() {
        let mut page = Pagination::default();
        assert!(!page.prev());
        assert!(page.next(2));
        assert_eq!(page.current_page(), 2);
        assert!(!page.next(2));
        assert!(page.prev());
        assert_eq!(page.current_page(), 1);
    }

    #[test]
    fn test_go_to() {
        let mut page = Pagination::default();
        assert!(!page.go_to(1, 3).unwrap());
        assert!(page.go_to(3, 3).unwrap());
        assert!(matches!(
            page.go_to(4, 3),
            Err(CartError::PageOutOfRange { page: 4, total_pages: 3 })
        ));
        assert!(page.go_to(0, 3).is_err());
        assert_eq!(page.current_page(), 3);
    }

    #[test]
    fn test_clamp_and_normalize() {
        let mut page = at(2);
        assert!(page.clamp(1));
        assert_eq!(page.current_page(), 1);
        assert!(!page.clamp(5));

        assert!(page.clamp(0));
        assert_eq!(page.current_page(), 0);
        assert!(!page.normalize(0));
        assert!(page.normalize(2));
        assert_eq!(page.current_page(), 1);
    }
}
