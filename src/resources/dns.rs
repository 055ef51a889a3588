//! DNS records (`GET /zones/{zone_id}/dns_records`)

use super::push_param;
use crate::client::{CloudflareClient, ListStream};
use crate::error::Result;
use crate::pagination::{ListQuery, OffsetExtractor, PageEnvelope, PageParams};
use crate::types::Direction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A DNS record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Record identifier
    pub id: String,
    /// Fully qualified name
    pub name: String,
    /// Record type (`A`, `AAAA`, `CNAME`, ...)
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record content
    #[serde(default)]
    pub content: String,
    /// Whether traffic is proxied through Cloudflare
    #[serde(default)]
    pub proxied: Option<bool>,
    /// Whether the record can be proxied
    #[serde(default)]
    pub proxiable: Option<bool>,
    /// TTL in seconds, 1 means automatic
    #[serde(default)]
    pub ttl: u32,
    /// Free-form comment
    #[serde(default)]
    pub comment: Option<String>,
    /// `name:value` tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation time
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,
    /// Last modification time
    #[serde(default)]
    pub modified_on: Option<DateTime<Utc>>,
}

/// How multiple filters combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Every filter must match
    #[default]
    All,
    /// Any filter may match
    Any,
}

impl MatchMode {
    /// Query string value
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::All => "all",
            MatchMode::Any => "any",
        }
    }
}

/// Sort field for DNS records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnsOrder {
    Type,
    Name,
    Content,
    Ttl,
    Proxied,
}

impl DnsOrder {
    /// Query string value
    pub fn as_str(&self) -> &'static str {
        match self {
            DnsOrder::Type => "type",
            DnsOrder::Name => "name",
            DnsOrder::Content => "content",
            DnsOrder::Ttl => "ttl",
            DnsOrder::Proxied => "proxied",
        }
    }
}

/// Filters for listing DNS records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsFilters {
    paging: PageParams,
    /// Record type
    pub record_type: Option<String>,
    /// Record name
    pub name: Option<String>,
    /// Record content
    pub content: Option<String>,
    /// Proxied status
    pub proxied: Option<bool>,
    /// How filters combine
    pub match_mode: Option<MatchMode>,
    /// Sort field
    pub order: Option<DnsOrder>,
    /// Sort direction
    pub direction: Option<Direction>,
}

impl DnsFilters {
    /// Empty filters
    pub fn new() -> Self {
        Self::default()
    }

    /// Only records of this type
    #[must_use]
    pub fn record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    /// Only records with this name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Only records with this content
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Only proxied (or unproxied) records
    #[must_use]
    pub fn proxied(mut self, proxied: bool) -> Self {
        self.proxied = Some(proxied);
        self
    }

    /// Combine filters with `mode`
    #[must_use]
    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = Some(mode);
        self
    }

    /// Sort by `order` in `direction`
    #[must_use]
    pub fn order(mut self, order: DnsOrder, direction: Direction) -> Self {
        self.order = Some(order);
        self.direction = Some(direction);
        self
    }
}

impl ListQuery for DnsFilters {
    fn page_params(&self) -> &PageParams {
        &self.paging
    }

    fn page_params_mut(&mut self) -> &mut PageParams {
        &mut self.paging
    }

    fn filter_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_param(&mut query, "type", self.record_type.as_deref());
        push_param(&mut query, "name", self.name.as_deref());
        push_param(&mut query, "content", self.content.as_deref());
        push_param(&mut query, "proxied", self.proxied);
        push_param(&mut query, "match", self.match_mode.map(|m| m.as_str()));
        push_param(&mut query, "order", self.order.map(|o| o.as_str()));
        push_param(&mut query, "direction", self.direction);
        query
    }
}

/// Handle for `/zones/{zone_id}/dns_records`
#[derive(Debug, Clone)]
pub struct DnsRecords<'a> {
    client: &'a CloudflareClient,
    path: String,
}

impl<'a> DnsRecords<'a> {
    pub(crate) fn new(client: &'a CloudflareClient, zone_id: impl Into<String>) -> Self {
        Self {
            client,
            path: format!("/zones/{}/dns_records", zone_id.into()),
        }
    }

    /// Fetch one page of records
    pub async fn list_page(&self, filters: &DnsFilters) -> Result<PageEnvelope<DnsRecord>> {
        self.client
            .list_page(&self.path, filters, &OffsetExtractor::default())
            .await
    }

    /// Stream all records matching `filters`
    pub fn list(&self, filters: DnsFilters) -> ListStream<'a, DnsRecord, DnsFilters> {
        self.client
            .paginate(self.path.clone(), filters, Arc::new(OffsetExtractor::default()))
    }
}
