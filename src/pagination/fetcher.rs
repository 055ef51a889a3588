//! Single-page fetch
//!
//! One GET per call, no retry. The raw envelope body is handed to the
//! injected [`PageInfoExtractor`] so resources can keep their pagination
//! metadata wherever they like.

use super::types::{extract_json_path, ListQuery, PageEnvelope, PageInfoExtractor};
use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Fetch one page of a list endpoint
///
/// Items keep server order; duplicates are preserved. Failures surface as
/// [`Error::Api`] with the HTTP status intact.
pub async fn fetch_page<T, Q>(
    client: &HttpClient,
    path: &str,
    query: &Q,
    extractor: &dyn PageInfoExtractor,
    cancel: Option<&CancellationToken>,
) -> Result<PageEnvelope<T>>
where
    T: DeserializeOwned,
    Q: ListQuery,
{
    let params = query.to_query();
    debug!("Fetching page of {} with {:?}", path, params);

    let body = client
        .request_value(
            Method::GET,
            path,
            RequestConfig::new().queries(params).cancel_opt(cancel),
        )
        .await?;

    parse_page(&body, extractor)
}

/// Decode a validated envelope body into a page
pub fn parse_page<T: DeserializeOwned>(
    body: &Value,
    extractor: &dyn PageInfoExtractor,
) -> Result<PageEnvelope<T>> {
    let items_path = extractor.items_path();
    let items = match extract_json_path(body, items_path) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| T::deserialize(v).map_err(Error::from))
            .collect::<Result<Vec<T>>>()?,
        Some(other) => {
            return Err(Error::decode(format!(
                "expected array at '{items_path}', found {}",
                json_kind(other)
            )))
        }
    };

    let page_info = extractor.extract(body)?;
    Ok(PageEnvelope::new(items, page_info))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
