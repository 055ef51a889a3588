//! D1 databases (`GET /accounts/{account_id}/d1/database`)
//!
//! The listing reports `total_pages: 0` regardless of size, so the stream
//! relies on short-page termination only.

use super::d1_jobs::{D1Export, D1Import, DumpOptions};
use super::push_param;
use crate::client::{CloudflareClient, ListStream};
use crate::error::Result;
use crate::pagination::{ListQuery, OffsetExtractor, PageEnvelope, PageParams};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A D1 database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct D1Database {
    /// Database identifier
    pub uuid: String,
    /// Database name
    pub name: String,
    /// Storage backend version
    #[serde(default)]
    pub version: Option<String>,
    /// Number of tables
    #[serde(default)]
    pub num_tables: Option<u64>,
    /// Size in bytes
    #[serde(default)]
    pub file_size: Option<u64>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Filters for listing databases
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct D1Filters {
    paging: PageParams,
    /// Exact database name
    pub name: Option<String>,
}

impl D1Filters {
    /// Empty filters
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the database with this name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl ListQuery for D1Filters {
    fn page_params(&self) -> &PageParams {
        &self.paging
    }

    fn page_params_mut(&mut self) -> &mut PageParams {
        &mut self.paging
    }

    fn filter_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_param(&mut query, "name", self.name.as_deref());
        query
    }
}

/// Handle for `/accounts/{account_id}/d1/database`
#[derive(Debug, Clone)]
pub struct D1Databases<'a> {
    client: &'a CloudflareClient,
    path: String,
}

impl<'a> D1Databases<'a> {
    pub(crate) fn new(client: &'a CloudflareClient, account_id: impl Into<String>) -> Self {
        Self {
            client,
            path: format!("/accounts/{}/d1/database", account_id.into()),
        }
    }

    /// Fetch one page of databases
    pub async fn list_page(&self, filters: &D1Filters) -> Result<PageEnvelope<D1Database>> {
        self.client
            .list_page(&self.path, filters, &OffsetExtractor::default())
            .await
    }

    /// Stream all databases
    pub fn list(&self, filters: D1Filters) -> ListStream<'a, D1Database, D1Filters> {
        self.client
            .paginate(self.path.clone(), filters, Arc::new(OffsetExtractor::default()))
    }

    /// Export job for `database_id`, to be driven by a [`crate::operation::Poller`]
    pub fn export(&self, database_id: &str, options: DumpOptions) -> D1Export<'a> {
        D1Export::new(
            self.client,
            format!("{}/{}/export", self.path, database_id),
            options,
        )
    }

    /// Import job loading `sql` into `database_id`
    ///
    /// The upload etag is the hex MD5 digest of `sql`. The API uses it to
    /// deduplicate uploads and R2 echoes it back on a successful upload.
    pub fn import(&self, database_id: &str, sql: impl Into<Bytes>) -> D1Import<'a> {
        D1Import::new(
            self.client,
            format!("{}/{}/import", self.path, database_id),
            sql.into(),
        )
    }
}
