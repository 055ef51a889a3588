//! CLI module
//!
//! Command-line interface over the resource clients.
//!
//! # Commands
//!
//! - `accounts`, `members`, `memberships` - account management listings
//! - `dns-records --zone <id>` - DNS records of a zone
//! - `widgets`, `d1-databases`, `r2-buckets`, `audit-logs` - account-scoped listings
//! - `d1-export --database <id>` - export a D1 database and wait for the dump
//!
//! Listings print one JSON object per line. Ctrl-C cancels in-flight work.

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, StatusArg};
pub use runner::Runner;
