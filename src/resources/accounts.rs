//! Accounts (`GET /accounts`)

use super::push_param;
use crate::client::{CloudflareClient, ListStream};
use crate::error::Result;
use crate::pagination::{ListQuery, OffsetExtractor, PageEnvelope, PageParams};
use crate::types::Direction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const ACCOUNTS_PATH: &str = "/accounts";

/// A Cloudflare account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier
    pub id: String,
    /// Account name
    #[serde(default)]
    pub name: String,
    /// `standard` or `enterprise`
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    /// Creation time
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,
    /// Account settings
    #[serde(default)]
    pub settings: Option<AccountSettings>,
}

/// Account-level settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSettings {
    /// Whether members must use two-factor authentication
    #[serde(default)]
    pub enforce_twofactor: bool,
    /// Abuse contact address
    #[serde(default)]
    pub abuse_contact_email: Option<String>,
}

/// Filters for listing accounts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilters {
    paging: PageParams,
    /// Account name
    pub name: Option<String>,
    /// Sort direction
    pub direction: Option<Direction>,
}

impl AccountFilters {
    /// Empty filters
    pub fn new() -> Self {
        Self::default()
    }

    /// Match on account name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the sort direction
    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }
}

impl ListQuery for AccountFilters {
    fn page_params(&self) -> &PageParams {
        &self.paging
    }

    fn page_params_mut(&mut self) -> &mut PageParams {
        &mut self.paging
    }

    fn filter_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_param(&mut query, "name", self.name.as_deref());
        push_param(&mut query, "direction", self.direction);
        query
    }
}

/// Handle for `/accounts`
#[derive(Debug, Clone, Copy)]
pub struct Accounts<'a> {
    client: &'a CloudflareClient,
}

impl<'a> Accounts<'a> {
    pub(crate) fn new(client: &'a CloudflareClient) -> Self {
        Self { client }
    }

    /// Fetch one page of accounts
    pub async fn list_page(&self, filters: &AccountFilters) -> Result<PageEnvelope<Account>> {
        self.client
            .list_page(ACCOUNTS_PATH, filters, &OffsetExtractor::default())
            .await
    }

    /// Stream all accounts matching `filters`
    pub fn list(&self, filters: AccountFilters) -> ListStream<'a, Account, AccountFilters> {
        self.client.paginate(
            ACCOUNTS_PATH.to_string(),
            filters,
            Arc::new(OffsetExtractor::default()),
        )
    }
}
