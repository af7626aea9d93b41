//! Fixed-size pagination with 1-based page numbers

use std::ops::Range;

use serde::Serialize;

/// Splits a list into pages of `page_size` entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
}

impl Pager {
    /// A zero page size is treated as 1
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages needed for `len` entries (0 for an empty list)
    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Clamp a requested page into `1..=page_count`
    pub fn clamp_page(&self, page: usize, len: usize) -> usize {
        page.clamp(1, self.page_count(len).max(1))
    }

    /// Absolute index range rendered on `page` (after clamping)
    pub fn page_bounds(&self, page: usize, len: usize) -> Range<usize> {
        let page = self.clamp_page(page, len);
        let start = ((page - 1) * self.page_size).min(len);
        let end = (start + self.page_size).min(len);
        start..end
    }

    /// Page on which absolute `index` is rendered
    pub fn page_of(&self, index: usize) -> usize {
        index / self.page_size + 1
    }

    /// Translate a visible `slot` on `page` into an absolute index
    ///
    /// Returns `None` when the page or slot does not exist for a list of `len`.
    pub fn absolute_index(&self, page: usize, slot: usize, len: usize) -> Option<usize> {
        if page == 0 || slot >= self.page_size {
            return None;
        }
        let index = (page - 1).checked_mul(self.page_size)?.checked_add(slot)?;
        (index < len).then_some(index)
    }

    /// Copy out one page of `items`
    pub fn paginate<T: Clone>(&self, items: &[T], page: usize) -> Page<T> {
        let bounds = self.page_bounds(page, items.len());
        Page {
            items: items[bounds].to_vec(),
            page: self.clamp_page(page, items.len()),
            page_size: self.page_size,
            total: items.len(),
            total_pages: self.page_count(items.len()),
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}
