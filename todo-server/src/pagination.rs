use serde::Deserialize;
use utoipa::IntoParams;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 10;

/// Largest row count SQL `LIMIT`/`OFFSET` accept (a signed 64-bit integer).
const MAX_SQL_ROWS: u64 = i64::MAX as u64;

/// `page` / `per_page` query parameters shared by the collection endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// 1-based page number; 0 is treated as 1
    #[serde(default)]
    page: Option<u64>,
    /// Page size, capped by the server's configured maximum
    #[serde(default)]
    per_page: Option<u64>,
}

impl Pagination {
    pub fn new(page: Option<u64>, per_page: Option<u64>) -> Self {
        Self { page, per_page }
    }

    /// Resolves the requested page against the defaults and the page size ceiling.
    pub fn resolve(&self, max_per_page: u64) -> Page {
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, max_per_page.max(1));
        Page::new(self.page.unwrap_or(DEFAULT_PAGE), per_page)
    }
}

/// A concrete page window. `page` is always at least 1 and neither the
/// page size nor the offset ever exceeds what SQL can bind; a page past that
/// point is simply empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    page: u64,
    per_page: u64,
}

impl Page {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.min(MAX_SQL_ROWS),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of rows to skip before this page starts.
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.per_page)
            .min(MAX_SQL_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_clamp_page_zero_to_first_page() {
        assert_eq!(Page::new(0, 10), Page::new(1, 10));
        assert_eq!(Page::new(0, 10).offset(), 0);
    }

    #[test]
    fn can_compute_offset_from_page_and_size() {
        assert_eq!(Page::new(3, 20).offset(), 40);
    }

    #[test]
    fn can_fall_back_to_defaults() {
        let page = Pagination::default().resolve(100);
        assert_eq!(page.page(), DEFAULT_PAGE);
        assert_eq!(page.per_page(), DEFAULT_PER_PAGE);
    }

    #[test]
    fn can_cap_per_page_at_maximum() {
        let page = Pagination::new(Some(2), Some(10_000)).resolve(100);
        assert_eq!(page.per_page(), 100);
        assert_eq!(page.offset(), 100);
    }

    #[test]
    fn can_keep_offset_bindable_for_largest_page() {
        let page = Pagination::new(Some(u64::MAX), Some(10)).resolve(100);
        assert_eq!(page.page(), u64::MAX);
        assert_eq!(page.offset(), i64::MAX as u64);
    }

    #[test]
    fn can_keep_page_size_bindable_with_unbounded_maximum() {
        let page = Pagination::new(Some(3), Some(u64::MAX)).resolve(u64::MAX);
        assert_eq!(page.per_page(), i64::MAX as u64);
        assert_eq!(page.offset(), i64::MAX as u64);
    }

    #[test]
    fn can_raise_zero_per_page_to_one() {
        assert_eq!(Pagination::new(None, Some(0)).resolve(100).per_page(), 1);
    }
}
