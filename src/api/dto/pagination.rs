//! Pagination query parameters and paged responses.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::pagination::Page;

/// Query parameters for paged listings.
///
/// Uses `serde_with` to parse the page number from the query string. Zero and
/// negative values are accepted and treated as the first page.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<i64>,
}

impl PageQuery {
    /// The requested 1-based page, defaulting to 1.
    pub fn page_number(&self) -> i64 {
        self.page.unwrap_or(1)
    }
}

/// One page of results with navigation metadata.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub data: Vec<T>,
    pub page_number: u64,
    pub total_pages: u64,
    pub total_elements: u64,
    pub is_first: bool,
    pub is_last: bool,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T, U> From<Page<U>> for PagedResult<T>
where
    T: From<U>,
{
    fn from(page: Page<U>) -> Self {
        let total_pages = page.total_pages();
        let is_first = page.is_first();
        let is_last = page.is_last();
        let has_next = page.has_next();
        let has_previous = page.has_previous();

        PagedResult {
            data: page.items.into_iter().map(T::from).collect(),
            page_number: page.page_number,
            total_pages,
            total_elements: page.total_elements,
            is_first,
            is_last,
            has_next,
            has_previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pagination::PageRequest;

    #[test]
    fn test_page_query_defaults_to_first_page() {
        let q: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.page_number(), 1);
    }

    #[test]
    fn test_page_query_parses_strings() {
        let q: PageQuery = serde_json::from_str(r#"{"page": "-5"}"#).unwrap();
        assert_eq!(q.page_number(), -5);

        assert!(serde_json::from_str::<PageQuery>(r#"{"page": "two"}"#).is_err());
    }

    #[test]
    fn test_paged_result_from_page() {
        let page = Page::new(vec![1_i64, 2, 3], PageRequest::new(2, 3), 7);

        let result: PagedResult<i64> = page.into();

        assert_eq!(result.data, vec![1, 2, 3]);
        assert_eq!(result.page_number, 2);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.total_elements, 7);
        assert!(!result.is_first);
        assert!(!result.is_last);
        assert!(result.has_next);
        assert!(result.has_previous);
    }

    #[test]
    fn test_paged_result_serializes_camel_case() {
        let page: Page<i64> = Page::new(vec![], PageRequest::new(1, 10), 0);
        let value = serde_json::to_value(PagedResult::<i64>::from(page)).unwrap();

        for field in [
            "data",
            "pageNumber",
            "totalPages",
            "totalElements",
            "isFirst",
            "isLast",
            "hasNext",
            "hasPrevious",
        ] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
        assert_eq!(value["isFirst"], true);
        assert_eq!(value["isLast"], true);
    }
}
