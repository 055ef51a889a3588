//! Pagination module
//!
//! Supports: page-number (offset) pagination and cursor pagination
//!
//! # Overview
//!
//! [`fetch_page`] issues one request and parses one [`PageEnvelope`]. Where
//! the pagination metadata lives is decided by an injected
//! [`PageInfoExtractor`]. [`Paginator`] turns a page fetcher into a lazy
//! stream of items that follows pages until the server runs dry.

mod fetcher;
mod stream;
mod strategies;
mod types;

pub use fetcher::{fetch_page, parse_page};
pub use stream::{Pages, Paginator};
pub use strategies::{next_query, CursorExtractor, NoExtractor, OffsetExtractor};
pub use types::{
    extract_json_path, CursorInfo, ListQuery, NextPage, PageEnvelope, PageInfo, PageInfoExtractor,
    PageMeta, PageParams,
};

#[cfg(test)]
mod tests;
