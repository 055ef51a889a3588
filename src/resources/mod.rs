//! Resource clients
//!
//! One handle per Cloudflare resource family. Each handle pairs an immutable
//! filter type (implementing [`crate::pagination::ListQuery`]) with the page
//! extractor matching the resource's envelope, and exposes:
//!
//! - `list_page` - one request, one [`crate::pagination::PageEnvelope`]
//! - `list` - a lazy stream over every item
//!
//! D1 additionally exposes export and import as long-running operations.

mod accounts;
mod audit_logs;
mod d1;
mod d1_jobs;
mod dns;
mod members;
mod memberships;
mod r2;
mod turnstile;

pub use accounts::{Account, AccountFilters, AccountSettings, Accounts};
pub use audit_logs::{AuditAction, AuditActor, AuditLog, AuditLogFilters, AuditLogs};
pub use d1::{D1Database, D1Databases, D1Filters};
pub use d1_jobs::{D1Export, D1Import, DumpOptions, ExportResult, ImportResult};
pub use dns::{DnsFilters, DnsOrder, DnsRecord, DnsRecords, MatchMode};
pub use members::{Member, MemberFilters, MemberOrder, MemberStatus, MemberUser, Members, Role};
pub use memberships::{
    Membership, MembershipAccount, MembershipFilters, MembershipOrder, Memberships,
};
pub use r2::{R2Bucket, R2BucketFilters, R2Buckets};
pub use turnstile::{TurnstileWidget, TurnstileWidgets, WidgetFilters, WidgetOrder};

/// Append `key=value` when the value is set
pub(crate) fn push_param(
    query: &mut Vec<(String, String)>,
    key: &str,
    value: Option<impl ToString>,
) {
    if let Some(value) = value {
        query.push((key.to_string(), value.to_string()));
    }
}
