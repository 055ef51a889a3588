//! Page-info extraction strategies and next-page computation
//!
//! Each extractor handles one pagination shape found in Cloudflare envelopes.

use super::types::{
    extract_json_path, CursorInfo, ListQuery, NextPage, PageEnvelope, PageInfo, PageInfoExtractor,
    PageMeta,
};
use crate::error::{Error, Result};
use serde_json::Value;
use tracing::debug;

// ============================================================================
// Offset (page number) pagination
// ============================================================================

/// Reads `page`, `per_page`, `count`, `total_count` and `total_pages`
///
/// Used by accounts, members, memberships, DNS records, Turnstile widgets and
/// D1 databases. Missing numeric fields default to zero, except `count`,
/// which defaults to the length of the `result` array.
#[derive(Debug, Clone)]
pub struct OffsetExtractor {
    /// Dotted path to the metadata object
    pub path: String,
}

impl OffsetExtractor {
    /// Create an extractor reading from a custom path
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for OffsetExtractor {
    fn default() -> Self {
        Self::new("result_info")
    }
}

impl PageInfoExtractor for OffsetExtractor {
    fn extract(&self, body: &Value) -> Result<Option<PageMeta>> {
        let Some(info) = extract_json_path(body, &self.path).filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        if !info.is_object() {
            return Err(Error::decode(format!(
                "expected object at '{}', found {info}",
                self.path
            )));
        }

        let result_len = body
            .get("result")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        let field = |name: &str| info.get(name).and_then(Value::as_u64);
        let narrow = |name: &str| -> Result<u32> {
            field(name)
                .map(u32::try_from)
                .transpose()
                .map_err(|_| Error::decode(format!("'{name}' out of range")))
                .map(Option::unwrap_or_default)
        };

        let count = match field("count") {
            Some(_) => narrow("count")?,
            None => u32::try_from(result_len).unwrap_or(u32::MAX),
        };

        Ok(Some(PageMeta::Offset(PageInfo {
            page: narrow("page")?,
            per_page: narrow("per_page")?,
            count,
            total_count: field("total_count").unwrap_or_default(),
            total_pages: narrow("total_pages")?,
        })))
    }
}

// ============================================================================
// Cursor pagination
// ============================================================================

/// Reads a continuation cursor from a dotted path
///
/// The cursor key differs between resources (`result_info.cursor` for R2
/// buckets and audit logs, `result_info.cursors.after` elsewhere), so the
/// path is configurable.
#[derive(Debug, Clone)]
pub struct CursorExtractor {
    /// Dotted path to the cursor string
    pub path: String,
    /// Dotted path to the item array
    pub items_path: String,
}

impl CursorExtractor {
    /// Create an extractor for the given cursor path
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            items_path: "result".to_string(),
        }
    }

    /// Read items from somewhere other than `result`
    #[must_use]
    pub fn with_items_path(mut self, items_path: impl Into<String>) -> Self {
        self.items_path = items_path.into();
        self
    }
}

impl Default for CursorExtractor {
    fn default() -> Self {
        Self::new("result_info.cursor")
    }
}

impl PageInfoExtractor for CursorExtractor {
    fn extract(&self, body: &Value) -> Result<Option<PageMeta>> {
        let cursor = match extract_json_path(body, &self.path) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(Error::decode(format!(
                    "expected string cursor at '{}', found {other}",
                    self.path
                )))
            }
        };
        Ok(Some(PageMeta::Cursor(CursorInfo::new(cursor))))
    }

    fn items_path(&self) -> &str {
        &self.items_path
    }
}

// ============================================================================
// Unpaginated
// ============================================================================

/// Extractor for single-page resources
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExtractor;

impl PageInfoExtractor for NoExtractor {
    fn extract(&self, _body: &Value) -> Result<Option<PageMeta>> {
        Ok(None)
    }
}

// ============================================================================
// Next page
// ============================================================================

/// Decide which query (if any) fetches the page after `page`
///
/// Offset style continues while the page is full and never consults
/// `total_pages`. Cursor style continues while a non-empty cursor comes back.
/// An empty page always ends the sequence.
pub fn next_query<Q: ListQuery, T>(query: &Q, page: &PageEnvelope<T>) -> Result<NextPage<Q>> {
    match &page.page_info {
        None => Ok(NextPage::Done),
        Some(PageMeta::Offset(info)) => next_offset(query, info, page.len()),
        Some(PageMeta::Cursor(info)) => next_cursor(query, info, page.len()),
    }
}

fn next_offset<Q: ListQuery>(query: &Q, info: &PageInfo, len: usize) -> Result<NextPage<Q>> {
    if info.count as usize != len {
        return Err(Error::pagination(format!(
            "result_info.count is {} but the page holds {len} items",
            info.count
        )));
    }

    let requested = query.per_page().filter(|&n| n > 0);
    if let Some(requested) = requested {
        if info.per_page > 0 && info.per_page < requested {
            debug!(
                "Server capped per_page at {} (requested {})",
                info.per_page, requested
            );
        }
    }

    // A server that caps the page size reports the effective value.
    let per_page = match (requested, info.per_page) {
        (Some(requested), server) if server > 0 => requested.min(server),
        (Some(requested), _) => requested,
        (None, server) if server > 0 => server,
        _ => {
            if len == 0 {
                return Ok(NextPage::Done);
            }
            let current = query.page().unwrap_or(1);
            return Ok(if info.total_pages > current {
                NextPage::Continue(query.with_page(current + 1))
            } else {
                NextPage::Done
            });
        }
    };

    if let Some(requested) = requested {
        if len > requested as usize {
            return Err(Error::pagination(format!(
                "page holds {len} items, more than per_page {requested}"
            )));
        }
    }

    if len == 0 || len < per_page as usize {
        return Ok(NextPage::Done);
    }

    let current = query.page().unwrap_or(1);
    Ok(NextPage::Continue(query.with_page(current + 1)))
}

fn next_cursor<Q: ListQuery>(query: &Q, info: &CursorInfo, len: usize) -> Result<NextPage<Q>> {
    let Some(cursor) = info.next() else {
        return Ok(NextPage::Done);
    };

    if len == 0 {
        return Ok(NextPage::Done);
    }

    if query.cursor() == Some(cursor) {
        return Err(Error::pagination(format!(
            "cursor '{cursor}' did not advance"
        )));
    }

    Ok(NextPage::Continue(query.with_cursor(cursor)))
}
