//! Page slicing for the result table

use std::ops::Range;

use super::PresenterError;

/// Rows-per-page choices offered to the user
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 25];

/// Rows per page before the user picks anything
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Current page index and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Start on the first page with the given page size
    pub fn new(page_size: usize) -> Result<Self, PresenterError> {
        let mut pagination = Self::default();
        pagination.set_page_size(page_size)?;
        Ok(pagination)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Change rows per page; always returns to the first page
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), PresenterError> {
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            return Err(PresenterError::InvalidPageSize(page_size));
        }
        self.page_size = page_size;
        self.page = 0;
        Ok(())
    }

    /// Jump to a page of a list with `total` rows
    pub fn set_page(&mut self, page: usize, total: usize) -> Result<(), PresenterError> {
        let page_count = self.page_count(total);
        if page >= page_count {
            return Err(PresenterError::PageOutOfRange { page, page_count });
        }
        self.page = page;
        Ok(())
    }

    /// Advance one page; returns false when already on the last page
    pub fn next(&mut self, total: usize) -> bool {
        self.set_page(self.page + 1, total).is_ok()
    }

    /// Go back one page; returns false when already on the first page
    pub fn prev(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.page -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.page = 0;
    }

    /// Number of pages for `total` rows (an empty list still has one page)
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Index range `[page*size, page*size+size)` clipped to `total`
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = (self.page * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }

    /// The rows of the current page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = Pagination::default();
        assert_eq!(p.page(), 0);
        assert_eq!(p.page_size(), 5);
    }

    #[test]
    fn test_slice_pages() {
        let items: Vec<usize> = (0..12).collect();
        let mut p = Pagination::default();
        assert_eq!(p.slice(&items), &[0, 1, 2, 3, 4]);
        assert!(p.next(items.len()));
        assert_eq!(p.slice(&items), &[5, 6, 7, 8, 9]);
        assert!(p.next(items.len()));
        assert_eq!(p.slice(&items), &[10, 11]);
        assert!(!p.next(items.len()));
        assert_eq!(p.page(), 2);
    }

    #[test]
    fn test_slice_never_exceeds_bounds() {
        for total in 0..40 {
            let items: Vec<usize> = (0..total).collect();
            for size in PAGE_SIZE_OPTIONS {
                let p = Pagination::new(size).unwrap();
                for page in 0..p.page_count(total) {
                    let mut q = p;
                    q.set_page(page, total).unwrap();
                    let slice = q.slice(&items);
                    assert!(slice.len() <= size);
                    assert!(slice.iter().all(|&i| i < total));
                }
            }
        }
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let mut p = Pagination::default();
        p.set_page(3, 40).unwrap();
        p.set_page_size(10).unwrap();
        assert_eq!(p.page(), 0);
        assert_eq!(p.page_size(), 10);

        p.set_page(1, 40).unwrap();
        p.set_page_size(10).unwrap();
        assert_eq!(p.page(), 0);
    }

    #[test]
    fn test_invalid_page_size_is_rejected() {
        let mut p = Pagination::default();
        p.set_page(1, 10).unwrap();
        assert_eq!(p.set_page_size(7), Err(PresenterError::InvalidPageSize(7)));
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_size(), 5);
        assert!(Pagination::new(0).is_err());
    }

    #[test]
    fn test_page_out_of_range() {
        let mut p = Pagination::default();
        assert_eq!(
            p.set_page(2, 10),
            Err(PresenterError::PageOutOfRange {
                page: 2,
                page_count: 2
            })
        );
        assert!(p.set_page(0, 0).is_ok());
        assert_eq!(p.page_count(0), 1);
    }

    #[test]
    fn test_prev() {
        let mut p = Pagination::default();
        assert!(!p.prev());
        p.set_page(1, 10).unwrap();
        assert!(p.prev());
        assert_eq!(p.page(), 0);
    }
}
