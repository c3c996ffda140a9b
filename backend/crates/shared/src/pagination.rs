//! In-memory pagination
//!
//! Event lists are sorted by distance after they are loaded, so paging happens
//! on the sorted vector rather than in SQL.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// `pageSize` / `currentPage` query parameters, both 1-based and optional.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page_size: Option<usize>,
    pub current_page: Option<usize>,
}

impl PageRequest {
    pub fn new(page_size: usize, current_page: usize) -> Self {
        Self {
            page_size: Some(page_size),
            current_page: Some(current_page),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn current_page(&self) -> usize {
        self.current_page.unwrap_or(1).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub count: usize,
}

/// Cut one page out of `items`. Pages past the end are empty.
pub fn paginate<T>(items: Vec<T>, request: &PageRequest) -> (PageMeta, Vec<T>) {
    let page_size = request.page_size();
    let current_page = request.current_page();
    let count = items.len();

    let meta = PageMeta {
        current_page,
        page_count: count.div_ceil(page_size),
        page_size,
        count,
    };

    let page = items
        .into_iter()
        .skip((current_page - 1).saturating_mul(page_size))
        .take(page_size)
        .collect();

    (meta, page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = PageRequest::default();
        assert_eq!(request.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(request.current_page(), 1);
    }

    #[test]
    fn test_second_page() {
        let (meta, page) = paginate((1..=5).collect(), &PageRequest::new(2, 2));
        assert_eq!(page, vec![3, 4]);
        assert_eq!(
            meta,
            PageMeta {
                current_page: 2,
                page_count: 3,
                page_size: 2,
                count: 5
            }
        );
    }

    #[test]
    fn test_last_partial_page_and_out_of_range() {
        let (_, page) = paginate((1..=5).collect(), &PageRequest::new(2, 3));
        assert_eq!(page, vec![5]);

        let (meta, page) = paginate((1..=5).collect::<Vec<i32>>(), &PageRequest::new(2, 9));
        assert!(page.is_empty());
        assert_eq!(meta.page_count, 3);
    }

    #[test]
    fn test_zero_values_are_clamped() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page_size(), 1);
        assert_eq!(request.current_page(), 1);
    }
}
