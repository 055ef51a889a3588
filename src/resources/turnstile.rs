//! Turnstile widgets (`GET /accounts/{account_id}/challenges/widgets`)

use super::push_param;
use crate::client::{CloudflareClient, ListStream};
use crate::error::Result;
use crate::pagination::{ListQuery, OffsetExtractor, PageEnvelope, PageParams};
use crate::types::Direction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A Turnstile widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnstileWidget {
    /// Public site key, also the widget identifier
    pub sitekey: String,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Hostnames the widget is valid on
    #[serde(default)]
    pub domains: Vec<String>,
    /// `non-interactive`, `invisible` or `managed`
    #[serde(default)]
    pub mode: Option<String>,
    /// Bot fight mode (enterprise only)
    #[serde(default)]
    pub bot_fight_mode: bool,
    /// Region the widget runs in
    #[serde(default)]
    pub region: Option<String>,
    /// Whether Cloudflare branding is removed
    #[serde(default)]
    pub offlabel: bool,
    /// Clearance cookie level
    #[serde(default)]
    pub clearance_level: Option<String>,
    /// Creation time
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,
    /// Last modification time
    #[serde(default)]
    pub modified_on: Option<DateTime<Utc>>,
}

/// Sort field for widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetOrder {
    Id,
    Sitekey,
    Name,
    CreatedOn,
    ModifiedOn,
}

impl WidgetOrder {
    /// Query string value
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetOrder::Id => "id",
            WidgetOrder::Sitekey => "sitekey",
            WidgetOrder::Name => "name",
            WidgetOrder::CreatedOn => "created_on",
            WidgetOrder::ModifiedOn => "modified_on",
        }
    }
}

/// Filters for listing widgets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetFilters {
    paging: PageParams,
    /// Sort field
    pub order: Option<WidgetOrder>,
    /// Sort direction
    pub direction: Option<Direction>,
}

impl WidgetFilters {
    /// Empty filters
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort by `order` in `direction`
    #[must_use]
    pub fn order(mut self, order: WidgetOrder, direction: Direction) -> Self {
        self.order = Some(order);
        self.direction = Some(direction);
        self
    }
}

impl ListQuery for WidgetFilters {
    fn page_params(&self) -> &PageParams {
        &self.paging
    }

    fn page_params_mut(&mut self) -> &mut PageParams {
        &mut self.paging
    }

    fn filter_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_param(&mut query, "order", self.order.map(|o| o.as_str()));
        push_param(&mut query, "direction", self.direction);
        query
    }
}

/// Handle for `/accounts/{account_id}/challenges/widgets`
#[derive(Debug, Clone)]
pub struct TurnstileWidgets<'a> {
    client: &'a CloudflareClient,
    path: String,
}

impl<'a> TurnstileWidgets<'a> {
    pub(crate) fn new(client: &'a CloudflareClient, account_id: impl Into<String>) -> Self {
        Self {
            client,
            path: format!("/accounts/{}/challenges/widgets", account_id.into()),
        }
    }

    /// Fetch one page of widgets
    pub async fn list_page(
        &self,
        filters: &WidgetFilters,
    ) -> Result<PageEnvelope<TurnstileWidget>> {
        self.client
            .list_page(&self.path, filters, &OffsetExtractor::default())
            .await
    }

    /// Stream all widgets
    pub fn list(&self, filters: WidgetFilters) -> ListStream<'a, TurnstileWidget, WidgetFilters> {
        self.client
            .paginate(self.path.clone(), filters, Arc::new(OffsetExtractor::default()))
    }
}
