//! Memberships of the current user (`GET /memberships`)

use super::push_param;
use super::MemberStatus;
use crate::client::{CloudflareClient, ListStream};
use crate::error::Result;
use crate::pagination::{ListQuery, OffsetExtractor, PageEnvelope, PageParams};
use crate::types::Direction;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

const MEMBERSHIPS_PATH: &str = "/memberships";

/// Membership of the current user in an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    /// Membership identifier
    pub id: String,
    /// Invitation status
    #[serde(default)]
    pub status: Option<MemberStatus>,
    /// The account
    #[serde(default)]
    pub account: MembershipAccount,
    /// Role names
    #[serde(default)]
    pub roles: Vec<String>,
    /// Whether API access is enabled for this membership
    #[serde(default)]
    pub api_access_enabled: Option<bool>,
    /// Permission grants, shape varies
    #[serde(default)]
    pub permissions: Option<Value>,
}

/// Account summary inside a membership
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipAccount {
    /// Account identifier
    #[serde(default)]
    pub id: String,
    /// Account name
    #[serde(default)]
    pub name: String,
}

/// Sort field for memberships
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOrder {
    Id,
    AccountName,
    Status,
}

impl MembershipOrder {
    /// Query string value
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipOrder::Id => "id",
            MembershipOrder::AccountName => "account.name",
            MembershipOrder::Status => "status",
        }
    }
}

/// Filters for listing memberships
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipFilters {
    paging: PageParams,
    /// Invitation status
    pub status: Option<MemberStatus>,
    /// Account name
    pub account_name: Option<String>,
    /// Sort field
    pub order: Option<MembershipOrder>,
    /// Sort direction
    pub direction: Option<Direction>,
}

impl MembershipFilters {
    /// Empty filters
    pub fn new() -> Self {
        Self::default()
    }

    /// Only memberships with this status
    #[must_use]
    pub fn status(mut self, status: MemberStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Only memberships of accounts with this name
    #[must_use]
    pub fn account_name(mut self, name: impl Into<String>) -> Self {
        self.account_name = Some(name.into());
        self
    }

    /// Sort by `order` in `direction`
    #[must_use]
    pub fn order(mut self, order: MembershipOrder, direction: Direction) -> Self {
        self.order = Some(order);
        self.direction = Some(direction);
        self
    }
}

impl ListQuery for MembershipFilters {
    fn page_params(&self) -> &PageParams {
        &self.paging
    }

    fn page_params_mut(&mut self) -> &mut PageParams {
        &mut self.paging
    }

    fn filter_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_param(&mut query, "status", self.status);
        push_param(&mut query, "account.name", self.account_name.as_deref());
        push_param(&mut query, "order", self.order.map(|o| o.as_str()));
        push_param(&mut query, "direction", self.direction);
        query
    }
}

/// Handle for `/memberships`
#[derive(Debug, Clone, Copy)]
pub struct Memberships<'a> {
    client: &'a CloudflareClient,
}

impl<'a> Memberships<'a> {
    pub(crate) fn new(client: &'a CloudflareClient) -> Self {
        Self { client }
    }

    /// Fetch one page of memberships
    pub async fn list_page(
        &self,
        filters: &MembershipFilters,
    ) -> Result<PageEnvelope<Membership>> {
        self.client
            .list_page(MEMBERSHIPS_PATH, filters, &OffsetExtractor::default())
            .await
    }

    /// Stream all memberships matching `filters`
    pub fn list(
        &self,
        filters: MembershipFilters,
    ) -> ListStream<'a, Membership, MembershipFilters> {
        self.client.paginate(
            MEMBERSHIPS_PATH.to_string(),
            filters,
            Arc::new(OffsetExtractor::default()),
        )
    }
}
