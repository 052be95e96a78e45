//! JSON search request envelope.

use serde::{Deserialize, Serialize};

use crate::filter::FilterCondition;
use crate::ordering::OrderSpec;
use crate::query::{PageRequest, DEFAULT_PAGE_SIZE};

/// Filters, sort keys and paging as sent by an API client.
///
/// ```
/// use sieve::SearchRequest;
///
/// let request: SearchRequest = serde_json::from_str(r#"{
///     "filters": [
///         { "propertyName": "title", "operation": "contains", "value": "lamp" }
///     ],
///     "sort": [{ "propertyName": "price", "descending": true }],
///     "page": 2
/// }"#).unwrap();
///
/// assert_eq!(request.filters.len(), 1);
/// assert_eq!(request.page_request().map(|p| p.page_size), Some(20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default, alias = "filter", alias = "conditions")]
    pub filters: Vec<FilterCondition>,
    #[serde(default, alias = "orderBy", alias = "order_by")]
    pub sort: Vec<OrderSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(default, alias = "page_size", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

impl SearchRequest {
    pub fn new() -> Self {
        SearchRequest::default()
    }

    pub fn filter(mut self, condition: FilterCondition) -> Self {
        self.filters.push(condition);
        self
    }

    pub fn sort_by(mut self, spec: OrderSpec) -> Self {
        self.sort.push(spec);
        self
    }

    pub fn page(mut self, page: usize, page_size: usize) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    /// Returns the requested page window, or `None` when the request asks
    /// for every match. A missing page size defaults to
    /// [`DEFAULT_PAGE_SIZE`], a missing page to the first page.
    pub fn page_request(&self) -> Option<PageRequest> {
        if self.page.is_none() && self.page_size.is_none() {
            return None;
        }
        Some(PageRequest::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        ))
    }
}
