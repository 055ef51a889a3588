//! Account audit logs (`GET /accounts/{account_id}/logs/audit`)
//!
//! Cursor paginated with `limit` as the page-size parameter. `since` is
//! required by the API; listing without it is rejected server-side.

use super::push_param;
use crate::client::{CloudflareClient, ListStream};
use crate::error::Result;
use crate::pagination::{CursorExtractor, ListQuery, PageEnvelope, PageParams};
use crate::types::Direction;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// One audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    /// Entry identifier
    pub id: String,
    /// What happened
    #[serde(default)]
    pub action: AuditAction,
    /// Who did it
    #[serde(default)]
    pub actor: AuditActor,
    /// Affected resource, shape varies by product
    #[serde(default)]
    pub resource: Option<Value>,
    /// Account the action belongs to
    #[serde(default)]
    pub account: Option<Value>,
}

/// The action part of an audit entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditAction {
    /// Action kind (`create`, `delete`, `login`, ...)
    #[serde(rename = "type", default)]
    pub action_type: Option<String>,
    /// Outcome, e.g. `success`
    #[serde(default)]
    pub result: Option<String>,
    /// Human readable summary
    #[serde(default)]
    pub description: Option<String>,
    /// When the action happened
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
}

/// The actor part of an audit entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditActor {
    /// Actor identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Actor email
    #[serde(default)]
    pub email: Option<String>,
    /// Actor kind (`user`, `token`, `system`)
    #[serde(rename = "type", default)]
    pub actor_type: Option<String>,
    /// Source IP address
    #[serde(default)]
    pub ip_address: Option<String>,
}

/// Filters for listing audit logs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLogFilters {
    paging: PageParams,
    /// Lower time bound (inclusive)
    pub since: Option<DateTime<Utc>>,
    /// Upper time bound (exclusive)
    pub before: Option<DateTime<Utc>>,
    /// Sort direction by time
    pub direction: Option<Direction>,
    /// Action type (`create`, `delete`, ...)
    pub action_type: Option<String>,
    /// Actor email
    pub actor_email: Option<String>,
}

impl AuditLogFilters {
    /// Entries in `[since, before)`
    pub fn new(since: DateTime<Utc>, before: DateTime<Utc>) -> Self {
        Self {
            since: Some(since),
            before: Some(before),
            ..Self::default()
        }
    }

    /// Set the sort direction
    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Only entries with this action type
    #[must_use]
    pub fn action_type(mut self, action_type: impl Into<String>) -> Self {
        self.action_type = Some(action_type.into());
        self
    }

    /// Only entries by this actor
    #[must_use]
    pub fn actor_email(mut self, email: impl Into<String>) -> Self {
        self.actor_email = Some(email.into());
        self
    }
}

fn rfc3339(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl ListQuery for AuditLogFilters {
    fn page_params(&self) -> &PageParams {
        &self.paging
    }

    fn page_params_mut(&mut self) -> &mut PageParams {
        &mut self.paging
    }

    fn per_page_param(&self) -> &'static str {
        "limit"
    }

    fn filter_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_param(&mut query, "since", self.since.as_ref().map(rfc3339));
        push_param(&mut query, "before", self.before.as_ref().map(rfc3339));
        push_param(&mut query, "direction", self.direction);
        push_param(&mut query, "action.type", self.action_type.as_deref());
        push_param(&mut query, "actor.email", self.actor_email.as_deref());
        query
    }
}

/// Handle for `/accounts/{account_id}/logs/audit`
#[derive(Debug, Clone)]
pub struct AuditLogs<'a> {
    client: &'a CloudflareClient,
    path: String,
}

impl<'a> AuditLogs<'a> {
    pub(crate) fn new(client: &'a CloudflareClient, account_id: impl Into<String>) -> Self {
        Self {
            client,
            path: format!("/accounts/{}/logs/audit", account_id.into()),
        }
    }

    /// Fetch one page of entries
    pub async fn list_page(&self, filters: &AuditLogFilters) -> Result<PageEnvelope<AuditLog>> {
        self.client
            .list_page(&self.path, filters, &CursorExtractor::default())
            .await
    }

    /// Stream all entries in the filter window
    pub fn list(&self, filters: AuditLogFilters) -> ListStream<'a, AuditLog, AuditLogFilters> {
        self.client
            .paginate(self.path.clone(), filters, Arc::new(CursorExtractor::default()))
    }
}
