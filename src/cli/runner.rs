//! CLI runner - executes commands

use crate::cancel::CancellationToken;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::CloudflareClient;
use crate::config::ClientConfig;
use crate::error::{Result, ResultExt};
use crate::operation::{Poller, PollerConfig};
use crate::pagination::ListQuery;
use crate::resources::{
    AccountFilters, AuditLogFilters, D1Filters, DnsFilters, DumpOptions, MemberFilters,
    MembershipFilters, R2BucketFilters, WidgetFilters,
};
use chrono::{Duration as ChronoDuration, Utc};
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        let cancel = CancellationToken::new();
        spawn_ctrl_c(cancel.clone());

        let client = CloudflareClient::from_config(&config)?.with_cancel(cancel);
        let start = Instant::now();

        let count = match &self.cli.command {
            Commands::Accounts { name } => {
                let mut filters = AccountFilters::new();
                filters.name.clone_from(name);
                self.emit(client.accounts().list(self.paged(filters))).await?
            }
            Commands::Members { status } => {
                let mut filters = MemberFilters::new();
                filters.status = status.map(Into::into);
                let members = client.members(require_account(&config)?);
                self.emit(members.list(self.paged(filters))).await?
            }
            Commands::Memberships { status } => {
                let mut filters = MembershipFilters::new();
                filters.status = status.map(Into::into);
                self.emit(client.memberships().list(self.paged(filters)))
                    .await?
            }
            Commands::DnsRecords {
                zone,
                record_type,
                name,
            } => {
                let mut filters = DnsFilters::new();
                filters.record_type.clone_from(record_type);
                filters.name.clone_from(name);
                self.emit(client.dns_records(zone.as_str()).list(self.paged(filters)))
                    .await?
            }
            Commands::Widgets => {
                let widgets = client.turnstile_widgets(require_account(&config)?);
                self.emit(widgets.list(self.paged(WidgetFilters::new())))
                    .await?
            }
            Commands::D1Databases { name } => {
                let mut filters = D1Filters::new();
                filters.name.clone_from(name);
                let d1 = client.d1(require_account(&config)?);
                self.emit(d1.list(self.paged(filters))).await?
            }
            Commands::R2Buckets { name_contains } => {
                let mut filters = R2BucketFilters::new();
                filters.name_contains.clone_from(name_contains);
                let buckets = client.r2_buckets(require_account(&config)?);
                self.emit(buckets.list(self.paged(filters))).await?
            }
            Commands::AuditLogs { since, before } => {
                let before = before.unwrap_or_else(Utc::now);
                let since = since.unwrap_or_else(|| before - ChronoDuration::hours(24));
                let logs = client.audit_logs(require_account(&config)?);
                self.emit(logs.list(self.paged(AuditLogFilters::new(since, before))))
                    .await?
            }
            Commands::D1Export {
                database,
                no_data,
                no_schema,
                tables,
                poll_interval,
                max_polls,
            } => {
                let options = DumpOptions {
                    no_data: *no_data,
                    no_schema: *no_schema,
                    tables: tables.clone(),
                };
                let d1 = client.d1(require_account(&config)?);
                let export = d1.export(database, options);
                let poller = Poller::new(PollerConfig::new(
                    *max_polls,
                    Duration::from_secs(*poll_interval),
                ));
                let result = poller.run(&export, client.cancel_token()).await?;
                self.output(&result)?;
                1
            }
        };

        info!("Done: {} item(s) in {:?}", count, start.elapsed());
        Ok(())
    }

    /// Load configuration and apply command-line overrides
    fn load_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::load(self.cli.config.as_deref())
            .context("Failed to load configuration")?;
        if let Some(account_id) = &self.cli.account_id {
            config.account_id = Some(account_id.clone());
        }
        Ok(config)
    }

    fn paged<Q: ListQuery>(&self, filters: Q) -> Q {
        match self.cli.per_page {
            Some(per_page) => filters.with_per_page(per_page),
            None => filters,
        }
    }

    /// Print every item of `stream`, honoring `--max-items`
    async fn emit<T, S>(&self, stream: S) -> Result<usize>
    where
        T: Serialize,
        S: Stream<Item = Result<T>>,
    {
        let limit = self.cli.max_items.unwrap_or(usize::MAX);
        let mut stream = Box::pin(stream.take(limit));
        let mut count = 0;
        while let Some(item) = stream.next().await {
            self.output(&item?)?;
            count += 1;
        }
        Ok(count)
    }

    fn output<T: Serialize>(&self, item: &T) -> Result<()> {
        write_item(&mut std::io::stdout().lock(), self.cli.format, item)
    }
}

/// Write one item as a JSON line; a closed stdout surfaces as [`crate::Error::Io`]
fn write_item<W: Write, T: Serialize>(out: &mut W, format: OutputFormat, item: &T) -> Result<()> {
    let line = match format {
        OutputFormat::Json => serde_json::to_string(item)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(item)?,
    };
    writeln!(out, "{line}")?;
    Ok(())
}

fn require_account(config: &ClientConfig) -> Result<String> {
    config.require_account_id().map(str::to_string)
}

fn spawn_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            token.cancel();
        }
    });
}
