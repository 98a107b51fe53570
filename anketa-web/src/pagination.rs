//! Pagination utilities for survey lists

/// Page sizes a client may ask for
pub const PER_PAGE_OPTIONS: [i64; 5] = [10, 15, 25, 50, 100];

/// Page size when none (or an unsupported one) is requested
pub const DEFAULT_PER_PAGE: i64 = 15;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Rows per page
    pub per_page: i64,
    /// Last page number (at least 1, even for an empty list)
    pub last_page: i64,
    /// Index of the first row on this page
    pub offset: usize,
}

impl Pagination {
    /// Slice of `items` belonging to this page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset.min(items.len());
        let end = (start + self.per_page as usize).min(items.len());
        &items[start..end]
    }
}

/// Restrict a requested page size to [`PER_PAGE_OPTIONS`]
pub fn resolve_per_page(requested: Option<i64>) -> i64 {
    match requested {
        Some(n) if PER_PAGE_OPTIONS.contains(&n) => n,
        _ => DEFAULT_PER_PAGE,
    }
}

/// Calculate pagination metadata from total results and requested page
///
/// Ensures page is within valid bounds [1, last_page]
///
/// # Examples
/// ```
/// use anketa_web::pagination::calculate_pagination;
///
/// // 40 results at 15 per page = 3 pages (15 + 15 + 10)
/// let p = calculate_pagination(40, Some(2), Some(15));
/// assert_eq!(p.page, 2);
/// assert_eq!(p.last_page, 3);
/// assert_eq!(p.offset, 15);
///
/// // Out-of-bounds page gets clamped
/// let p = calculate_pagination(40, Some(99), Some(15));
/// assert_eq!(p.page, 3);
/// ```
pub fn calculate_pagination(total_results: usize, requested_page: Option<i64>, requested_per_page: Option<i64>) -> Pagination {
    let per_page = resolve_per_page(requested_per_page);
    let total = total_results as i64;
    let last_page = ((total + per_page - 1) / per_page).max(1);
    let page = requested_page.unwrap_or(1).max(1).min(last_page);
    let offset = ((page - 1) * per_page) as usize;

    Pagination {
        page,
        per_page,
        last_page,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_normal() {
        let p = calculate_pagination(60, Some(2), Some(25));
        assert_eq!(p.page, 2);
        assert_eq!(p.last_page, 3);
        assert_eq!(p.offset, 25);
    }

    #[test]
    fn test_pagination_defaults() {
        let p = calculate_pagination(100, None, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, DEFAULT_PER_PAGE);
        assert_eq!(p.last_page, 7);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_unsupported_per_page_falls_back() {
        assert_eq!(resolve_per_page(Some(7)), DEFAULT_PER_PAGE);
        assert_eq!(resolve_per_page(Some(0)), DEFAULT_PER_PAGE);
        assert_eq!(resolve_per_page(Some(-50)), DEFAULT_PER_PAGE);
        assert_eq!(resolve_per_page(Some(100)), 100);
    }

    #[test]
    fn test_pagination_out_of_bounds_high() {
        let p = calculate_pagination(20, Some(99), Some(10));
        assert_eq!(p.page, 2); // Clamped to last page
        assert_eq!(p.offset, 10);
    }

    #[test]
    fn test_pagination_out_of_bounds_low() {
        let p = calculate_pagination(20, Some(-3), Some(10));
        assert_eq!(p.page, 1);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_empty() {
        let p = calculate_pagination(0, Some(5), None);
        assert_eq!(p.page, 1);
        assert_eq!(p.last_page, 1);
        assert!(p.slice::<i32>(&[]).is_empty());
    }

    #[test]
    fn test_slice_last_partial_page() {
        let items: Vec<i32> = (1..=23).collect();
        let p = calculate_pagination(items.len(), Some(3), Some(10));
        assert_eq!(p.slice(&items), &[21, 22, 23]);
    }
}
