//! Page requests and page metadata for listings.
//!
//! Callers speak in 1-based page numbers; stores speak in zero-based
//! offsets. [`PageRequest`] performs that translation and [`Page`] derives
//! the navigation flags from the total element count.

/// A validated request for one page of results.
///
/// Page numbers below 1 are clamped to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: u64,
    page_size: u64,
}

impl PageRequest {
    /// Creates a request for the given 1-based page. A zero `page_size` is
    /// raised to 1.
    pub fn new(page_number: i64, page_size: u64) -> Self {
        Self {
            page_number: page_number.max(1) as u64,
            page_size: page_size.max(1),
        }
    }

    /// The 1-based page number after clamping.
    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }

    /// Number of rows to fetch.
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

/// One page of results plus the totals needed for navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: u64,
    pub page_size: u64,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            items,
            page_number: request.page_number(),
            page_size: request.page_size(),
            total_elements,
        }
    }

    /// Total number of pages; zero when there are no elements.
    pub fn total_pages(&self) -> u64 {
        total_pages(self.total_elements, self.page_size)
    }

    pub fn is_first(&self) -> bool {
        self.page_number == 1
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    /// Transforms every item while keeping the pagination metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_elements: self.total_elements,
        }
    }
}

/// Number of pages needed to hold `total_elements` at `page_size` per page.
pub fn total_pages(total_elements: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_elements.div_ceil(page_size)
}
