//! Pagination types and clamping rules
//!
//! Callers can request any page number and page size; the values are
//! silently clamped here rather than rejected. This is the caller-facing
//! contract: page is at least 1 and page size stays within
//! [1, [`MAX_PAGE_SIZE`]], regardless of input.

use serde::Serialize;

/// Upper bound on the number of items per page
pub const MAX_PAGE_SIZE: usize = 100;

/// Page size used when the caller does not specify one
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// A clamped pagination request
///
/// Construction clamps, so holding a `PageRequest` is proof the bounds
/// hold; there is no unchecked way to build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    page_size: usize,
}

impl PageRequest {
    /// Create a request, clamping page to ≥ 1 and size to [1, `MAX_PAGE_SIZE`]
    #[must_use]
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// The 1-based page number
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// The clamped page size
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Offset of the first item of this page
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus pagination metadata
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items of this page, possibly fewer than `page_size` at the end
    pub items: Vec<T>,
    /// The 1-based page number that was served
    pub page: usize,
    /// The clamped page size
    pub page_size: usize,
    /// Total number of items across all pages
    pub total_count: usize,
    /// Total number of pages, `ceil(total_count / page_size)`
    pub total_pages: usize,
}

impl<T: Clone> Page<T> {
    /// Build a page by slicing the full filtered result set
    #[must_use]
    pub fn from_slice(all: &[&T], request: PageRequest) -> Self {
        let total_count = all.len();
        let items = all
            .iter()
            .skip(request.offset())
            .take(request.page_size())
            .map(|&item| item.clone())
            .collect();
        Self {
            items,
            page: request.page(),
            page_size: request.page_size(),
            total_count,
            total_pages: total_pages(total_count, request.page_size()),
        }
    }
}

/// `ceil(total_count / page_size)`, defined as 0 for a page size of 0
#[must_use]
pub const fn total_pages(total_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        total_count.div_ceil(page_size)
    }
}
