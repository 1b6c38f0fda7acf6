// src/engine/paginate.rs

use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page {page} is out of range (1..={total_pages})")]
    OutOfRange { page: usize, total_pages: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    page_size: usize,
}

impl Pagination {
    /// A zero page size falls back to the default.
    pub fn new(page_size: usize) -> Self {
        Pagination {
            page_size: if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size },
        }
    }

    pub fn total_pages(&self, rows: usize) -> usize {
        rows.div_ceil(self.page_size).max(1)
    }

    /// Rows `[(page-1)*size, page*size)`. Past the end yields an empty slice.
    pub fn slice<'a, T>(&self, rows: &'a [T], page: usize) -> &'a [T] {
        let start = page.saturating_sub(1).saturating_mul(self.page_size).min(rows.len());
        let end = start.saturating_add(self.page_size).min(rows.len());
        &rows[start..end]
    }

    pub fn check(&self, page: usize, rows: usize) -> Result<PageInfo, PageError> {
        let total_pages = self.total_pages(rows);
        if page == 0 || page > total_pages {
            return Err(PageError::OutOfRange { page, total_pages });
        }
        Ok(PageInfo {
            page,
            page_size: self.page_size,
            total_rows: rows,
            total_pages,
        })
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_rows_make_three_pages() {
        let rows: Vec<usize> = (0..12).collect();
        let p = Pagination::new(5);

        assert_eq!(p.total_pages(rows.len()), 3);
        assert_eq!(p.slice(&rows, 1), &[0, 1, 2, 3, 4]);
        assert_eq!(p.slice(&rows, 3), &[10, 11]);
        assert!(p.slice(&rows, 4).is_empty());
        assert!(p.check(3, rows.len()).is_ok());
        assert_eq!(
            p.check(4, rows.len()),
            Err(PageError::OutOfRange { page: 4, total_pages: 3 })
        );
        assert!(p.check(0, rows.len()).is_err());
    }

    #[test]
    fn empty_list_has_one_empty_page() {
        let rows: Vec<usize> = Vec::new();
        let p = Pagination::default();

        assert_eq!(p.total_pages(0), 1);
        assert!(p.slice(&rows, 1).is_empty());
        let info = p.check(1, 0).unwrap();
        assert_eq!(info.total_pages, 1);
        assert_eq!(info.total_rows, 0);
    }

    #[test]
    fn slicing_is_idempotent() {
        let rows: Vec<usize> = (0..7).collect();
        let p = Pagination::new(5);
        assert_eq!(p.slice(&rows, 2), p.slice(&rows, 2));
        assert_eq!(p.slice(&rows, 2), &[5, 6]);
    }

    #[test]
    fn zero_page_size_uses_default() {
        let info = Pagination::new(0).check(1, 0).unwrap();
        assert_eq!(info.page_size, DEFAULT_PAGE_SIZE);
    }
}
