//! Page-number pagination primitives shared by scribe list endpoints.
//!
//! Clients send loosely typed `page` and `page_size` query values. Rather
//! than rejecting bad input, [`PageRequest`] normalises it: pages below one
//! become the first page and sizes outside `1..=MAX_PAGE_SIZE` (or values
//! that are not numbers at all) fall back to [`DEFAULT_PAGE_SIZE`].
//! [`Page`] carries one slice of results alongside the total row count and
//! the normalised request that produced it.

use serde::Serialize;

/// First page number; pages are one-based.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the client omits or mangles `page_size`.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A normalised, always-valid pagination request.
///
/// # Examples
///
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::clamped(0, 500);
/// assert_eq!(request.page(), 1);
/// assert_eq!(request.page_size(), 10);
/// assert_eq!(request.offset(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// The first page with the default page size.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Build a request from signed client input, clamping out-of-range
    /// values instead of failing.
    ///
    /// Pages below one become page one and pages beyond `u32::MAX` saturate.
    /// Page sizes outside `1..=MAX_PAGE_SIZE` fall back to
    /// [`DEFAULT_PAGE_SIZE`].
    #[must_use]
    pub fn clamped(page: i64, page_size: i64) -> Self {
        let page = if page < i64::from(DEFAULT_PAGE) {
            DEFAULT_PAGE
        } else {
            u32::try_from(page).unwrap_or(u32::MAX)
        };
        let page_size = u32::try_from(page_size)
            .ok()
            .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self { page, page_size }
    }

    /// Build a request from raw query-string values.
    ///
    /// Missing or non-numeric values are treated as the defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::from_raw(Some("3"), Some("abc"));
    /// assert_eq!(request.page(), 3);
    /// assert_eq!(request.page_size(), 10);
    /// ```
    #[must_use]
    pub fn from_raw(page: Option<&str>, page_size: Option<&str>) -> Self {
        let page = parse_or(page, i64::from(DEFAULT_PAGE));
        let page_size = parse_or(page_size, i64::from(DEFAULT_PAGE_SIZE));
        Self::clamped(page, page_size)
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Number of rows per page.
    #[must_use]
    pub const fn page_size(self) -> u32 {
        self.page_size
    }

    /// Number of rows to skip before this page starts.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Maximum number of rows on this page.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

fn parse_or(raw: Option<&str>, fallback: i64) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(fallback)
}

/// One page of results together with the total number of matching rows.
///
/// Serialises as `{ "items", "total", "page", "pageSize" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    page: u32,
    page_size: u32,
}

impl<T> Page<T> {
    /// Assemble a page from the rows fetched for `request`.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            page_size: request.page_size,
        }
    }

    /// Rows on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its rows.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Total number of rows across every page.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size used to slice the results.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Transform every row while keeping the paging metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}
