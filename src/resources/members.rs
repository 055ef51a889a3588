//! Account members (`GET /accounts/{account_id}/members`)

use super::push_param;
use crate::client::{CloudflareClient, ListStream};
use crate::error::Result;
use crate::pagination::{ListQuery, OffsetExtractor, PageEnvelope, PageParams};
use crate::types::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A member of an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Membership identifier
    pub id: String,
    /// Invitation status
    #[serde(default)]
    pub status: Option<MemberStatus>,
    /// The user behind the membership
    #[serde(default)]
    pub user: MemberUser,
    /// Roles granted to the member
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// User details of a member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberUser {
    /// User identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: String,
    /// First name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name
    #[serde(default)]
    pub last_name: Option<String>,
    /// Whether 2FA is enabled
    #[serde(default)]
    pub two_factor_authentication_enabled: bool,
}

/// A role granted to a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role identifier
    pub id: String,
    /// Role name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
}

/// Invitation status of a member or membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Accepted,
    Pending,
    Rejected,
}

impl MemberStatus {
    /// Query string value
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Accepted => "accepted",
            MemberStatus::Pending => "pending",
            MemberStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort field for members
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberOrder {
    FirstName,
    LastName,
    Email,
    Status,
}

impl MemberOrder {
    /// Query string value
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberOrder::FirstName => "user.first_name",
            MemberOrder::LastName => "user.last_name",
            MemberOrder::Email => "user.email",
            MemberOrder::Status => "status",
        }
    }
}

/// Filters for listing account members
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFilters {
    paging: PageParams,
    /// Invitation status
    pub status: Option<MemberStatus>,
    /// Sort field
    pub order: Option<MemberOrder>,
    /// Sort direction
    pub direction: Option<Direction>,
}

impl MemberFilters {
    /// Empty filters
    pub fn new() -> Self {
        Self::default()
    }

    /// Only members with this status
    #[must_use]
    pub fn status(mut self, status: MemberStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sort by `order` in `direction`
    #[must_use]
    pub fn order(mut self, order: MemberOrder, direction: Direction) -> Self {
        self.order = Some(order);
        self.direction = Some(direction);
        self
    }
}

impl ListQuery for MemberFilters {
    fn page_params(&self) -> &PageParams {
        &self.paging
    }

    fn page_params_mut(&mut self) -> &mut PageParams {
        &mut self.paging
    }

    fn filter_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_param(&mut query, "status", self.status);
        push_param(&mut query, "order", self.order.map(|o| o.as_str()));
        push_param(&mut query, "direction", self.direction);
        query
    }
}

/// Handle for `/accounts/{account_id}/members`
#[derive(Debug, Clone)]
pub struct Members<'a> {
    client: &'a CloudflareClient,
    path: String,
}

impl<'a> Members<'a> {
    pub(crate) fn new(client: &'a CloudflareClient, account_id: impl Into<String>) -> Self {
        Self {
            client,
            path: format!("/accounts/{}/members", account_id.into()),
        }
    }

    /// Fetch one page of members
    pub async fn list_page(&self, filters: &MemberFilters) -> Result<PageEnvelope<Member>> {
        self.client
            .list_page(&self.path, filters, &OffsetExtractor::default())
            .await
    }

    /// Stream all members matching `filters`
    pub fn list(&self, filters: MemberFilters) -> ListStream<'a, Member, MemberFilters> {
        self.client
            .paginate(self.path.clone(), filters, Arc::new(OffsetExtractor::default()))
    }
}
