use serde::{Deserialize, Serialize};

/// Column a page of users can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Id,
    Name,
    Lastname,
    Username,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Pagination request. `page` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u64 = 4;
    pub const MAX_SIZE: u64 = 1000;

    /// Build a request; the size is clamped to `1..=MAX_SIZE`.
    pub fn of(page: u64, size: u64) -> Self {
        Self {
            page,
            size: size.clamp(1, Self::MAX_SIZE),
            sort: None,
        }
    }

    pub fn with_sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort = Some(Sort { field, direction });
        self
    }

    /// Number of rows to skip. Saturates instead of overflowing for absurd page indexes.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// `offset()` as a signed SQL bound, `None` when it cannot be bound.
    pub fn sql_offset(&self) -> Option<i64> {
        i64::try_from(self.offset()).ok()
    }
}

/// A page of results plus the totals needed to render pagination controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let total_pages = total_elements.div_ceil(request.size);
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
        }
    }

    pub fn is_last(&self) -> bool {
        self.page.saturating_add(1) >= self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_bumped_to_one() {
        let req = PageRequest::of(3, 0);
        assert_eq!(req.size, 1);
        assert_eq!(req.offset(), 3);
    }

    #[test]
    fn total_pages_rounds_up() {
        let req = PageRequest::of(0, 4);
        let page: Page<u8> = Page::new(vec![1, 2, 3, 4], &req, 9);
        assert_eq!(page.total_pages, 3);
        assert!(!page.is_last());
    }

    #[test]
    fn empty_store_has_no_pages() {
        let req = PageRequest::of(0, 10);
        let page: Page<u8> = Page::new(Vec::new(), &req, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.is_last());
    }

    #[test]
    fn offset_saturates() {
        let req = PageRequest::of(u64::MAX, 10);
        assert_eq!(req.offset(), u64::MAX);
        assert_eq!(req.sql_offset(), None);
    }

    #[test]
    fn huge_size_is_clamped() {
        let req = PageRequest::of(2, u64::MAX);
        assert_eq!(req.size, PageRequest::MAX_SIZE);
        assert_eq!(req.sql_offset(), Some(2 * PageRequest::MAX_SIZE as i64));
    }

    #[test]
    fn last_page_index_does_not_overflow() {
        let page: Page<u8> = Page::new(Vec::new(), &PageRequest::of(u64::MAX, 10), 3);
        assert!(page.is_last());
    }
}
