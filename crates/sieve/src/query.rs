//! In-memory execution of compiled filters and orders.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::filter::CompiledFilter;
use crate::ordering::CompiledOrder;
use crate::traits::Filterable;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// A 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: usize,
    #[serde(alias = "page_size")]
    pub page_size: usize,
}

impl PageRequest {
    /// Creates a page request. Page `0` is treated as page `1`.
    pub fn new(page: usize, page_size: usize) -> Self {
        PageRequest {
            page: page.max(1),
            page_size,
        }
    }

    /// Number of items before this page.
    pub fn offset(&self) -> usize {
        self.page.max(1).saturating_sub(1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<I> {
    pub items: Vec<I>,
    /// Matches before paging.
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

impl<I> Page<I> {
    /// Number of pages needed for `total` items; `0` when nothing matched.
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            0
        } else {
            self.total.div_ceil(self.page_size)
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Maps the items, keeping the paging information.
    pub fn map<J>(self, f: impl FnMut(I) -> J) -> Page<J> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// A source of records a [`Query`] can run against.
///
/// Implemented for slices and vectors; other executors (a cache, a remote
/// store) can implement it to accept the same compiled queries.
pub trait Queryable<T> {
    /// Returns the requested page of records matching the query, in query
    /// order, with the total number of matches.
    fn fetch(&self, query: &Query<T>, page: PageRequest) -> Page<&T>;
}

impl<T: Filterable> Queryable<T> for [T] {
    fn fetch(&self, query: &Query<T>, page: PageRequest) -> Page<&T> {
        let matched = query.matching(self);
        let total = matched.len();
        let items = matched
            .into_iter()
            .skip(page.offset())
            .take(page.page_size)
            .collect();
        Page {
            items,
            total,
            page: page.page.max(1),
            page_size: page.page_size,
        }
    }
}

impl<T: Filterable> Queryable<T> for Vec<T> {
    fn fetch(&self, query: &Query<T>, page: PageRequest) -> Page<&T> {
        self.as_slice().fetch(query, page)
    }
}

/// A compiled filter and order, plus an optional result window.
///
/// Execution filters first, then sorts the matches (stable), then applies
/// offset and limit.
///
/// # Example
///
/// ```
/// use sieve::{compile_filter, compile_order, FilterCondition, Filterable, OrderSpec, Query};
///
/// #[derive(Filterable, Clone)]
/// struct Task {
///     #[filter(String)]
///     name: String,
///     #[filter(Int)]
///     priority: i32,
/// }
///
/// let tasks = vec![
///     Task { name: "Write docs".into(), priority: 3 },
///     Task { name: "Fix bug".into(), priority: 5 },
///     Task { name: "Old task".into(), priority: 1 },
/// ];
///
/// let query = Query::new()
///     .with_filter(compile_filter::<Task>(&[FilterCondition::new("priority", "gte", "3")]))
///     .with_order(compile_order::<Task>(&[OrderSpec::desc("priority")])?);
///
/// let results = query.filter(&tasks);
/// assert_eq!(results.len(), 2);
/// assert_eq!(results[0].name, "Fix bug");
/// # Ok::<(), sieve::FilterError>(())
/// ```
pub struct Query<T> {
    filter: CompiledFilter<T>,
    order: CompiledOrder<T>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl<T> Query<T> {
    /// Creates a query that matches everything in input order.
    pub fn new() -> Self {
        Query {
            filter: CompiledFilter::always(),
            order: CompiledOrder::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn with_filter(mut self, filter: CompiledFilter<T>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_order(mut self, order: CompiledOrder<T>) -> Self {
        self.order = order;
        self
    }

    /// Sets the maximum number of results to return.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets the number of results to skip.
    pub fn offset(mut self, n: usize) -> Self {
        self.offset = Some(n);
        self
    }

    /// Sets offset and limit from a page request.
    pub fn paged(self, page: PageRequest) -> Self {
        self.offset(page.offset()).limit(page.page_size)
    }

    pub fn compiled_filter(&self) -> &CompiledFilter<T> {
        &self.filter
    }

    pub fn compiled_order(&self) -> &CompiledOrder<T> {
        &self.order
    }

    /// Returns the limit, if set.
    pub fn get_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns the offset, if set.
    pub fn get_offset(&self) -> Option<usize> {
        self.offset
    }
}

impl<T: Filterable> Query<T> {
    /// Tests if a single record matches the filter.
    pub fn matches(&self, item: &T) -> bool {
        self.filter.matches(item)
    }

    /// All matches in query order, ignoring offset and limit.
    fn matching<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        let mut results: Vec<&'a T> = items.iter().filter(|item| self.matches(item)).collect();
        self.order.sort_refs(&mut results);
        results
    }

    /// Filters a slice, returning references to matching items.
    ///
    /// Results are sorted by the query's order, then offset and limit are
    /// applied.
    pub fn filter<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        let results = self.matching(items);
        let offset = self.offset.unwrap_or(0);
        let limit = self.limit.unwrap_or(usize::MAX);
        results.into_iter().skip(offset).take(limit).collect()
    }

    /// Filters and clones matching items.
    pub fn filter_cloned(&self, items: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        self.filter(items).into_iter().cloned().collect()
    }

    /// Keeps only matching items and sorts them in place.
    ///
    /// Offset and limit are not applied.
    pub fn filter_mut(&self, items: &mut Vec<T>) {
        items.retain(|item| self.matches(item));
        self.order.sort(items);
    }

    /// Counts the number of matching items.
    pub fn count(&self, items: &[T]) -> usize {
        items.iter().filter(|item| self.matches(item)).count()
    }

    /// Returns `true` if any item matches.
    pub fn any(&self, items: &[T]) -> bool {
        items.iter().any(|item| self.matches(item))
    }

    /// Returns `true` if all items match.
    pub fn all(&self, items: &[T]) -> bool {
        items.iter().all(|item| self.matches(item))
    }

    /// Returns the first match in query order.
    pub fn find<'a>(&self, items: &'a [T]) -> Option<&'a T> {
        if self.order.is_empty() {
            return items.iter().find(|item| self.matches(item));
        }
        items
            .iter()
            .filter(|item| self.matches(item))
            .min_by(|a, b| self.order.compare(a, b))
    }

    /// Returns one page of matches from any [`Queryable`] source.
    pub fn page<'a, Q>(&self, source: &'a Q, page: PageRequest) -> Page<&'a T>
    where
        Q: Queryable<T> + ?Sized,
    {
        source.fetch(self, page)
    }
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Query::new()
    }
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Query {
            filter: self.filter.clone(),
            order: self.order.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("filter", &self.filter)
            .field("order", &self.order)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish()
    }
}
