//! CLI commands and argument parsing

use crate::resources::MemberStatus;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cloudflare API command-line client
#[derive(Parser, Debug)]
#[command(name = "cloudflare-sdk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML); credentials come from the environment when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Account to operate on, overrides the configured one
    #[arg(short, long, global = true)]
    pub account_id: Option<String>,

    /// Page size to request
    #[arg(long, global = true)]
    pub per_page: Option<u32>,

    /// Stop after this many items
    #[arg(long, global = true)]
    pub max_items: Option<usize>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List accounts
    Accounts {
        /// Account name
        #[arg(long)]
        name: Option<String>,
    },

    /// List members of the account
    Members {
        /// Invitation status
        #[arg(long)]
        status: Option<StatusArg>,
    },

    /// List memberships of the current user
    Memberships {
        /// Invitation status
        #[arg(long)]
        status: Option<StatusArg>,
    },

    /// List DNS records of a zone
    DnsRecords {
        /// Zone identifier
        #[arg(long)]
        zone: String,

        /// Record type
        #[arg(long = "type")]
        record_type: Option<String>,

        /// Record name
        #[arg(long)]
        name: Option<String>,
    },

    /// List Turnstile widgets
    Widgets,

    /// List D1 databases
    D1Databases {
        /// Database name
        #[arg(long)]
        name: Option<String>,
    },

    /// List R2 buckets
    R2Buckets {
        /// Bucket name substring
        #[arg(long)]
        name_contains: Option<String>,
    },

    /// List audit log entries
    AuditLogs {
        /// Start of the window (RFC 3339), defaults to 24 hours ago
        #[arg(long)]
        since: Option<DateTime<Utc>>,

        /// End of the window (RFC 3339), defaults to now
        #[arg(long)]
        before: Option<DateTime<Utc>>,
    },

    /// Export a D1 database and print the download URL
    D1Export {
        /// Database identifier
        #[arg(long)]
        database: String,

        /// Schema only
        #[arg(long)]
        no_data: bool,

        /// Data only
        #[arg(long)]
        no_schema: bool,

        /// Restrict to a table (repeatable)
        #[arg(long = "table")]
        tables: Vec<String>,

        /// Seconds between polls
        #[arg(long, default_value = "5")]
        poll_interval: u64,

        /// Maximum number of polls
        #[arg(long, default_value = "120")]
        max_polls: u32,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one object per line)
    Json,
    /// Indented JSON
    Pretty,
}

/// Member status as a CLI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Accepted,
    Pending,
    Rejected,
}

impl From<StatusArg> for MemberStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Accepted => MemberStatus::Accepted,
            StatusArg::Pending => MemberStatus::Pending,
            StatusArg::Rejected => MemberStatus::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "cloudflare-sdk",
            "dns-records",
            "--zone",
            "z1",
            "--type",
            "A",
            "--per-page",
            "50",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.per_page, Some(50));
        match cli.command {
            Commands::DnsRecords {
                zone, record_type, ..
            } => {
                assert_eq!(zone, "z1");
                assert_eq!(record_type.as_deref(), Some("A"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_d1_export_defaults() {
        let cli =
            Cli::try_parse_from(["cloudflare-sdk", "d1-export", "--database", "db1"]).unwrap();
        match cli.command {
            Commands::D1Export {
                poll_interval,
                max_polls,
                tables,
                ..
            } => {
                assert_eq!(poll_interval, 5);
                assert_eq!(max_polls, 120);
                assert!(tables.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_audit_log_window() {
        let cli = Cli::try_parse_from([
            "cloudflare-sdk",
            "audit-logs",
            "--since",
            "2024-01-01T00:00:00Z",
        ])
        .unwrap();
        match cli.command {
            Commands::AuditLogs { since, before } => {
                assert_eq!(since.map(|t| t.timestamp()), Some(1_704_067_200));
                assert!(before.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_dns_records_requires_zone() {
        assert!(Cli::try_parse_from(["cloudflare-sdk", "dns-records"]).is_err());
    }
}
