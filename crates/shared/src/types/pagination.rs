//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Largest page size a client may request.
    pub const MAX_PER_PAGE: u32 = 100;

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * self.limit()
    }

    /// Returns the limit for database queries, clamped to `1..=MAX_PER_PAGE`.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page.clamp(1, Self::MAX_PER_PAGE))
    }

    /// Slices an already-loaded list to this page.
    #[must_use]
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        items.iter().skip(offset).take(limit).cloned().collect()
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u32,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        let per_page_nonzero = u64::from(per_page.max(1));
        let total_pages = if total == 0 {
            1
        } else {
            u32::try_from(total.div_ceil(per_page_nonzero)).unwrap_or(u32::MAX)
        };

        Self {
            data,
            meta: PageMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        }
    }

    /// Creates a response for `request`, reporting the clamped page size the
    /// query actually used.
    #[must_use]
    pub fn for_request(data: Vec<T>, request: &PageRequest, total: u64) -> Self {
        let per_page = u32::try_from(request.limit()).unwrap_or(PageRequest::MAX_PER_PAGE);
        Self::new(data, request.page.max(1), per_page, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit() {
        let page = PageRequest { page: 3, per_page: 10 };
        assert_eq!(page.offset(), 20);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn test_limit_is_clamped() {
        let page = PageRequest { page: 1, per_page: 5000 };
        assert_eq!(page.limit(), u64::from(PageRequest::MAX_PER_PAGE));
        let page = PageRequest { page: 0, per_page: 0 };
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 1);
    }

    #[test]
    fn test_slice() {
        let items: Vec<u32> = (1..=25).collect();
        let page = PageRequest { page: 3, per_page: 10 };
        assert_eq!(page.slice(&items), vec![21, 22, 23, 24, 25]);
    }

    #[test]
    fn test_total_pages() {
        let response: PageResponse<u32> = PageResponse::new(vec![], 1, 10, 0);
        assert_eq!(response.meta.total_pages, 1);
        let response: PageResponse<u32> = PageResponse::new(vec![], 1, 10, 21);
        assert_eq!(response.meta.total_pages, 3);
    }

    #[test]
    fn test_response_reports_clamped_page_size() {
        let request = PageRequest { page: 0, per_page: 5000 };
        let response: PageResponse<u32> = PageResponse::for_request(vec![], &request, 250);
        assert_eq!(response.meta.page, 1);
        assert_eq!(response.meta.per_page, PageRequest::MAX_PER_PAGE);
        assert_eq!(response.meta.total_pages, 3);
    }
}
