//! D1 export and import jobs
//!
//! Both endpoints are driven by re-posting to the same path with the latest
//! `current_bookmark`. Responses share one shape:
//!
//! ```json
//! {"status": "active", "at_bookmark": "...", "error": null, "result": {...}}
//! ```

use crate::auth::AuthConfig;
use crate::client::CloudflareClient;
use crate::error::{Error, Result};
use crate::operation::{LongRunningOperation, OperationState, OperationStatus};
use async_trait::async_trait;
use bytes::Bytes;
use md5::{Digest, Md5};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

/// What to include in an export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpOptions {
    /// Export schema only
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_data: bool,
    /// Export data only
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_schema: bool,
    /// Restrict to these tables
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<String>,
}

impl DumpOptions {
    fn is_empty(&self) -> bool {
        !self.no_data && !self.no_schema && self.tables.is_empty()
    }
}

/// Result of a finished export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportResult {
    /// Name of the dump file
    pub filename: String,
    /// Time-limited download URL
    pub signed_url: String,
}

/// Result of a finished import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    /// Bookmark after the last statement
    #[serde(default)]
    pub final_bookmark: Option<String>,
    /// Statements executed
    #[serde(default)]
    pub num_queries: u64,
    /// Execution metadata (rows written, duration, ...)
    #[serde(default)]
    pub meta: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct JobResponse<R> {
    #[serde(default)]
    at_bookmark: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
    result: Option<R>,
    #[serde(default)]
    messages: Vec<Value>,
    #[serde(default)]
    upload_url: Option<String>,
    #[serde(default)]
    filename: Option<String>,
}

impl<R> JobResponse<R> {
    fn into_state(self) -> Result<OperationState<R>> {
        let status = match self.status.as_deref() {
            Some("active") => OperationStatus::Active,
            Some("complete") => match self.result {
                Some(result) => OperationStatus::Complete(result),
                None => return Err(Error::decode("job reported complete without a result")),
            },
            Some("error") => OperationStatus::Error(
                self.error
                    .or_else(|| first_message(&self.messages))
                    .unwrap_or_else(|| "unknown error".to_string()),
            ),
            _ => OperationStatus::Pending,
        };
        Ok(OperationState::new(status, self.at_bookmark))
    }
}

fn first_message(messages: &[Value]) -> Option<String> {
    messages.iter().find_map(|m| match m {
        Value::String(s) => Some(s.clone()),
        other => other
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn sql_etag(sql: &[u8]) -> String {
    hex::encode(Md5::digest(sql))
}

async fn post_job<R: DeserializeOwned>(
    client: &CloudflareClient,
    path: &str,
    body: Value,
    retry: bool,
) -> Result<JobResponse<R>> {
    client.post_json(path, body, retry).await
}

// ============================================================================
// Export
// ============================================================================

/// Export of a D1 database to a downloadable SQL dump
#[derive(Debug, Clone)]
pub struct D1Export<'a> {
    client: &'a CloudflareClient,
    path: String,
    options: DumpOptions,
}

impl<'a> D1Export<'a> {
    pub(crate) fn new(client: &'a CloudflareClient, path: String, options: DumpOptions) -> Self {
        Self {
            client,
            path,
            options,
        }
    }

    fn body(&self, bookmark: Option<&str>) -> Value {
        let mut body = json!({ "output_format": "polling" });
        if !self.options.is_empty() {
            body["dump_options"] = json!(self.options);
        }
        if let Some(bookmark) = bookmark {
            body["current_bookmark"] = json!(bookmark);
        }
        body
    }
}

#[async_trait]
impl<'a> LongRunningOperation for D1Export<'a> {
    type Output = ExportResult;

    fn name(&self) -> &str {
        "d1 export"
    }

    async fn initiate(&self) -> Result<OperationState<ExportResult>> {
        post_job::<ExportResult>(self.client, &self.path, self.body(None), false)
            .await?
            .into_state()
    }

    async fn poll(&self, bookmark: Option<&str>) -> Result<OperationState<ExportResult>> {
        post_job::<ExportResult>(self.client, &self.path, self.body(bookmark), true)
            .await?
            .into_state()
    }
}

// ============================================================================
// Import
// ============================================================================

/// Import of a SQL file into a D1 database
///
/// Initiation runs three requests: `init` to reserve an upload slot, a PUT of
/// the SQL to the returned pre-signed URL, and `ingest` to start execution.
/// The upload is skipped when the server already holds a file with the same
/// etag.
#[derive(Debug, Clone)]
pub struct D1Import<'a> {
    client: &'a CloudflareClient,
    path: String,
    sql: Bytes,
    etag: String,
}

impl<'a> D1Import<'a> {
    pub(crate) fn new(client: &'a CloudflareClient, path: String, sql: Bytes) -> Self {
        let etag = sql_etag(&sql);
        Self {
            client,
            path,
            sql,
            etag,
        }
    }

    /// Hex MD5 of the SQL, as sent in `init` and echoed by storage
    pub fn etag(&self) -> &str {
        &self.etag
    }

    async fn upload(&self, upload_url: &str) -> Result<()> {
        // Pre-signed URL: account credentials must not leak to storage.
        let config = self
            .client
            .request()
            .raw(self.sql.clone())
            .auth(AuthConfig::None);
        let response = self
            .client
            .http()
            .request(Method::PUT, upload_url, config)
            .await?;

        let returned = response
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim_matches('"').to_string());
        match returned {
            Some(returned) if returned != self.etag => Err(Error::operation(format!(
                "upload etag mismatch: expected {}, storage returned {returned}",
                self.etag
            ))),
            _ => {
                debug!("Uploaded {} bytes for import", self.sql.len());
                Ok(())
            }
        }
    }
}

#[async_trait]
impl<'a> LongRunningOperation for D1Import<'a> {
    type Output = ImportResult;

    fn name(&self) -> &str {
        "d1 import"
    }

    async fn initiate(&self) -> Result<OperationState<ImportResult>> {
        let init: JobResponse<Value> = post_job(
            self.client,
            &self.path,
            json!({ "action": "init", "etag": self.etag }),
            false,
        )
        .await?;

        if init.status.as_deref() == Some("error") {
            return match init.into_state()?.status {
                OperationStatus::Error(message) => Err(Error::operation(message)),
                _ => Err(Error::operation("import init failed")),
            };
        }

        let filename = match (init.upload_url, init.filename) {
            (Some(url), Some(filename)) => {
                self.upload(&url).await?;
                filename
            }
            (None, Some(filename)) => {
                info!("File {} already uploaded, skipping upload", filename);
                filename
            }
            (_, None) => return Err(Error::decode("import init returned no filename")),
        };

        post_job::<ImportResult>(
            self.client,
            &self.path,
            json!({ "action": "ingest", "etag": self.etag, "filename": filename }),
            false,
        )
        .await?
        .into_state()
    }

    async fn poll(&self, bookmark: Option<&str>) -> Result<OperationState<ImportResult>> {
        let mut body = json!({ "action": "poll" });
        if let Some(bookmark) = bookmark {
            body["current_bookmark"] = json!(bookmark);
        }
        post_job::<ImportResult>(self.client, &self.path, body, true)
            .await?
            .into_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse<R: DeserializeOwned>(value: Value) -> OperationState<R> {
        serde_json::from_value::<JobResponse<R>>(value)
            .unwrap()
            .into_state()
            .unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let state: OperationState<ExportResult> =
            parse(json!({"status": "active", "at_bookmark": "b1"}));
        assert_eq!(state, OperationState::active("b1"));

        let state: OperationState<ExportResult> = parse(json!({"status": "queued"}));
        assert_eq!(state.status, OperationStatus::Pending);

        let state: OperationState<ExportResult> = parse(json!({
            "status": "complete",
            "result": {"filename": "db.sql", "signed_url": "https://r2/x"}
        }));
        assert_eq!(
            state.status,
            OperationStatus::Complete(ExportResult {
                filename: "db.sql".into(),
                signed_url: "https://r2/x".into(),
            })
        );
    }

    #[test]
    fn test_error_message_fallbacks() {
        let state: OperationState<ExportResult> =
            parse(json!({"status": "error", "error": "table missing"}));
        assert_eq!(state.status, OperationStatus::Error("table missing".into()));

        let state: OperationState<ExportResult> =
            parse(json!({"status": "error", "messages": [{"message": "disk full"}]}));
        assert_eq!(state.status, OperationStatus::Error("disk full".into()));

        let state: OperationState<ExportResult> = parse(json!({"status": "error"}));
        assert_eq!(state.status, OperationStatus::Error("unknown error".into()));
    }

    #[test]
    fn test_complete_without_result_is_decode_error() {
        let response: JobResponse<ExportResult> =
            serde_json::from_value(json!({"status": "complete"})).unwrap();
        let err = response.into_state().unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_sql_etag_is_hex_md5() {
        assert_eq!(sql_etag(b"SELECT 1;"), "71568061b2970a4b7c5160fe75356e10");
        assert_eq!(sql_etag(b""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_dump_options_skip_defaults() {
        assert_eq!(json!(DumpOptions::default()), json!({}));
        let options = DumpOptions {
            no_data: true,
            tables: vec!["users".into()],
            ..DumpOptions::default()
        };
        assert_eq!(json!(options), json!({"no_data": true, "tables": ["users"]}));
    }
}
