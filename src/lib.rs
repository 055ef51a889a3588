// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Cloudflare SDK
//!
//! Async client core for the Cloudflare v4 REST API.
//!
//! ## Features
//!
//! - **Paged fetching**: one request, one typed page plus pagination metadata
//! - **Auto-pagination**: lazy item streams over offset and cursor endpoints
//! - **Long-running operations**: bounded polling with bookmarks (D1 export/import)
//! - **Opt-in retries**: transient-status retry wrapper for idempotent calls
//! - **Cancellation**: one token aborts requests, delays and poll waits
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cloudflare_sdk::{ClientConfig, CloudflareClient, Result};
//! use cloudflare_sdk::resources::DnsFilters;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let client = CloudflareClient::from_config(&config)?;
//!
//!     let mut records = client.dns_records("zone-id").list(DnsFilters::new().record_type("A"));
//!     while let Some(record) = records.next().await {
//!         println!("{}", record?.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        CloudflareClient                         │
//! │  accounts()  members()  dns_records()  d1()  r2_buckets()  ...  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────┬──────────────┬───┴──────────┬───────────┬──────────┐
//! │   HTTP    │  Pagination  │  Operation   │   Retry   │  Cancel  │
//! ├───────────┼──────────────┼──────────────┼───────────┼──────────┤
//! │ Envelope  │ fetch_page   │ Poller       │ with_retry│ Token    │
//! │ Auth      │ Paginator    │ Bookmarks    │ Backoff   │ guard    │
//! │ Rate Limit│ Offset/Cursor│ Timeout      │           │ sleep    │
//! └───────────┴──────────────┴──────────────┴───────────┴──────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the SDK
pub mod error;

/// Common types
pub mod types;

/// Authentication schemes
pub mod auth;

/// Cancellation helpers
pub mod cancel;

/// HTTP transport with rate limiting
pub mod http;

/// Paged fetching and auto-pagination
pub mod pagination;

/// Long-running operation polling
pub mod operation;

/// Transient-error retry wrapper
pub mod retry;

/// Client configuration
pub mod config;

/// Client entry point
pub mod client;

/// Resource clients
pub mod resources;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::CloudflareClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
