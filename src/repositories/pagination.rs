//! Page-number pagination shared by the repositories.

use crate::config::MAX_PAGE_SIZE;

/// Highest page number served; keeps `page * per_page` well inside `u64`
pub const MAX_PAGE: u64 = u32::MAX as u64;

/// A validated request for one page of records (1-based page numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Build a page request, falling back to page 1 and `default_per_page`.
    ///
    /// Zero values fall back to the defaults; `page` is capped at [`MAX_PAGE`] and
    /// `per_page` at [`MAX_PAGE_SIZE`].
    pub fn new(page: Option<u64>, per_page: Option<u64>, default_per_page: u64) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1).min(MAX_PAGE);
        let per_page = per_page
            .filter(|p| *p > 0)
            .unwrap_or(default_per_page)
            .clamp(1, MAX_PAGE_SIZE);
        Self { page, per_page }
    }

    /// Zero-based page index as used by SeaORM paginators.
    pub fn index(&self) -> u64 {
        self.page - 1
    }
}

/// One page of records plus navigation metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
    /// 1-based position of the first record on this page
    pub from: Option<u64>,
    /// 1-based position of the last record on this page
    pub to: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        let last_page = total.div_ceil(request.per_page).max(1);
        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let from = request.index() * request.per_page + 1;
            (Some(from), Some(from + data.len() as u64 - 1))
        };

        Self {
            data,
            current_page: request.page,
            per_page: request.per_page,
            total,
            last_page,
            from,
            to,
        }
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page
    }
}
