//! Pagination types and traits
//!
//! Defines the page envelope, the two pagination metadata shapes and the
//! immutable list-query abstraction shared by all resource filters.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Offset-style pagination metadata (`result_info` with page numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageInfo {
    /// Current page (1-based)
    pub page: u32,
    /// Page size the server applied
    pub per_page: u32,
    /// Number of items on this page
    pub count: u32,
    /// Total items across all pages (unreliable on some resources)
    pub total_count: u64,
    /// Total number of pages (D1 always reports 0)
    pub total_pages: u32,
}

/// Cursor-style pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CursorInfo {
    /// Continuation cursor; `None` or empty means no further pages
    pub cursor: Option<String>,
}

impl CursorInfo {
    /// Create cursor info
    pub fn new(cursor: Option<String>) -> Self {
        Self { cursor }
    }

    /// The cursor, if it signals another page
    pub fn next(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// Pagination metadata of either style
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageMeta {
    /// Page-number pagination
    Offset(PageInfo),
    /// Cursor pagination
    Cursor(CursorInfo),
}

/// One fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct PageEnvelope<T> {
    /// Items in server order, duplicates preserved
    pub items: Vec<T>,
    /// Pagination metadata, absent for unpaginated resources
    pub page_info: Option<PageMeta>,
}

impl<T> PageEnvelope<T> {
    /// Create a page
    pub fn new(items: Vec<T>, page_info: Option<PageMeta>) -> Self {
        Self { items, page_info }
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Offset metadata, if this is an offset-style page
    pub fn offset_info(&self) -> Option<&PageInfo> {
        match &self.page_info {
            Some(PageMeta::Offset(info)) => Some(info),
            _ => None,
        }
    }

    /// Returned cursor, if this is a cursor-style page with more data
    pub fn next_cursor(&self) -> Option<&str> {
        match &self.page_info {
            Some(PageMeta::Cursor(info)) => info.next(),
            _ => None,
        }
    }
}

/// Pagination fields common to every list query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageParams {
    /// Page number (offset style)
    pub page: Option<u32>,
    /// Page size
    pub per_page: Option<u32>,
    /// Continuation cursor (cursor style)
    pub cursor: Option<String>,
}

impl PageParams {
    /// Page-number params
    pub fn page(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            cursor: None,
        }
    }

    /// Append the set fields as query parameters
    pub fn push_query(
        &self,
        query: &mut Vec<(String, String)>,
        per_page_param: &str,
        cursor_param: &str,
    ) {
        if let Some(page) = self.page {
            query.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            query.push((per_page_param.to_string(), per_page.to_string()));
        }
        if let Some(cursor) = &self.cursor {
            query.push((cursor_param.to_string(), cursor.clone()));
        }
    }
}

/// An immutable list filter
///
/// Implementors hold [`PageParams`] plus resource predicates. Advancing
/// never mutates a query: [`ListQuery::with_page`] and
/// [`ListQuery::with_cursor`] return a new value.
pub trait ListQuery: Clone + Send + Sync {
    /// Pagination fields
    fn page_params(&self) -> &PageParams;

    /// Mutable pagination fields, used only on a fresh clone
    fn page_params_mut(&mut self) -> &mut PageParams;

    /// Resource-specific query parameters (predicates, ordering)
    fn filter_query(&self) -> Vec<(String, String)>;

    /// Query parameter carrying the page size
    fn per_page_param(&self) -> &'static str {
        "per_page"
    }

    /// Query parameter carrying the cursor
    fn cursor_param(&self) -> &'static str {
        "cursor"
    }

    /// Requested page size
    fn per_page(&self) -> Option<u32> {
        self.page_params().per_page
    }

    /// Requested page number
    fn page(&self) -> Option<u32> {
        self.page_params().page
    }

    /// Requested cursor
    fn cursor(&self) -> Option<&str> {
        self.page_params().cursor.as_deref()
    }

    /// A copy targeting another page number
    #[must_use]
    fn with_page(&self, page: u32) -> Self {
        let mut next = self.clone();
        next.page_params_mut().page = Some(page);
        next
    }

    /// Set the page size
    #[must_use]
    fn with_per_page(mut self, per_page: u32) -> Self {
        self.page_params_mut().per_page = Some(per_page);
        self
    }

    /// A copy continuing from a cursor
    #[must_use]
    fn with_cursor(&self, cursor: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.page_params_mut().cursor = Some(cursor.into());
        next
    }

    /// All query parameters for one request
    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = self.filter_query();
        self.page_params()
            .push_query(&mut query, self.per_page_param(), self.cursor_param());
        query
    }
}

/// Extracts pagination metadata from a raw envelope body
///
/// Resources disagree on where pagination lives (`result_info.cursor`,
/// `result_info.cursors.after`, ...), so each resource client injects the
/// extractor matching its envelope.
pub trait PageInfoExtractor: Send + Sync {
    /// Read the metadata; `Ok(None)` means the resource is not paginated
    fn extract(&self, body: &Value) -> Result<Option<PageMeta>>;

    /// Dotted path to the item array
    fn items_path(&self) -> &str {
        "result"
    }
}

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage<Q> {
    /// Fetch again with this query
    Continue(Q),
    /// No more pages
    Done,
}

impl<Q> NextPage<Q> {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }
}

/// Extract a JSON value from a dotted path (e.g. `result_info.cursors.after`)
pub fn extract_json_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }

    Some(current)
}
