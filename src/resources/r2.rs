//! R2 buckets (`GET /accounts/{account_id}/r2/buckets`)
//!
//! Cursor paginated. Items live under `result.buckets` rather than `result`.

use super::push_param;
use crate::client::{CloudflareClient, ListStream};
use crate::error::Result;
use crate::pagination::{CursorExtractor, ListQuery, PageEnvelope, PageParams};
use crate::types::Direction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An R2 bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct R2Bucket {
    /// Bucket name
    pub name: String,
    /// Creation time
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
    /// Location hint
    #[serde(default)]
    pub location: Option<String>,
    /// `Standard` or `InfrequentAccess`
    #[serde(default)]
    pub storage_class: Option<String>,
}

/// Filters for listing buckets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct R2BucketFilters {
    paging: PageParams,
    /// Substring of the bucket name
    pub name_contains: Option<String>,
    /// Start listing after this bucket name
    pub start_after: Option<String>,
    /// Sort direction (buckets are ordered by name)
    pub direction: Option<Direction>,
}

impl R2BucketFilters {
    /// Empty filters
    pub fn new() -> Self {
        Self::default()
    }

    /// Only buckets whose name contains `needle`
    #[must_use]
    pub fn name_contains(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    /// Skip buckets up to and including `name`
    #[must_use]
    pub fn start_after(mut self, name: impl Into<String>) -> Self {
        self.start_after = Some(name.into());
        self
    }

    /// Set the sort direction
    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }
}

impl ListQuery for R2BucketFilters {
    fn page_params(&self) -> &PageParams {
        &self.paging
    }

    fn page_params_mut(&mut self) -> &mut PageParams {
        &mut self.paging
    }

    fn filter_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_param(&mut query, "name_contains", self.name_contains.as_deref());
        push_param(&mut query, "start_after", self.start_after.as_deref());
        if let Some(direction) = self.direction {
            push_param(&mut query, "order", Some("name"));
            push_param(&mut query, "direction", Some(direction));
        }
        query
    }
}

fn extractor() -> CursorExtractor {
    CursorExtractor::default().with_items_path("result.buckets")
}

/// Handle for `/accounts/{account_id}/r2/buckets`
#[derive(Debug, Clone)]
pub struct R2Buckets<'a> {
    client: &'a CloudflareClient,
    path: String,
}

impl<'a> R2Buckets<'a> {
    pub(crate) fn new(client: &'a CloudflareClient, account_id: impl Into<String>) -> Self {
        Self {
            client,
            path: format!("/accounts/{}/r2/buckets", account_id.into()),
        }
    }

    /// Fetch one page of buckets
    pub async fn list_page(&self, filters: &R2BucketFilters) -> Result<PageEnvelope<R2Bucket>> {
        self.client.list_page(&self.path, filters, &extractor()).await
    }

    /// Stream all buckets
    pub fn list(&self, filters: R2BucketFilters) -> ListStream<'a, R2Bucket, R2BucketFilters> {
        self.client
            .paginate(self.path.clone(), filters, Arc::new(extractor()))
    }
}
