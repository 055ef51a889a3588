//! Cloudflare response envelope
//!
//! Every v4 endpoint wraps its payload as
//! `{ success, errors, messages, result, result_info }`. Failure envelopes
//! are turned into [`Error::Api`] here so the pagination and polling layers
//! only ever see validated success bodies.

use crate::error::{ApiMessage, Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Typed Cloudflare envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the call succeeded
    #[serde(default)]
    pub success: bool,
    /// Error entries (non-empty on failure)
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    /// Informational messages
    #[serde(default)]
    pub messages: Vec<Value>,
    /// Payload
    pub result: Option<T>,
    /// Pagination metadata, shape varies by resource
    #[serde(default)]
    pub result_info: Option<Value>,
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Decode a validated envelope body
    pub fn from_value(body: Value) -> Result<Self> {
        serde_json::from_value(body).map_err(Error::from)
    }

    /// Take the payload, failing when the server sent `result: null`
    pub fn into_result(self) -> Result<T> {
        self.result
            .ok_or_else(|| Error::decode("envelope has no result"))
    }
}

/// Validate a parsed body against its HTTP status
///
/// Returns the body when the status is 2xx and `success` is not `false`.
pub fn check_envelope(status: u16, body: Value) -> Result<Value> {
    let success = body.get("success").and_then(Value::as_bool);
    let is_2xx = (200..300).contains(&status);

    if is_2xx && success != Some(false) {
        return Ok(body);
    }

    Err(Error::api(status, extract_errors(&body)))
}

/// Build an API error from a raw (possibly non-JSON) error body
pub fn error_from_body(status: u16, text: &str) -> Error {
    match serde_json::from_str::<Value>(text) {
        Ok(body) => Error::api(status, extract_errors(&body)),
        Err(_) if text.trim().is_empty() => Error::api(status, Vec::new()),
        Err(_) => Error::api(status, vec![ApiMessage::new(0, text.trim())]),
    }
}

fn extract_errors(body: &Value) -> Vec<ApiMessage> {
    body.get("errors")
        .and_then(|v| serde_json::from_value::<Vec<ApiMessage>>(v.clone()).ok())
        .unwrap_or_default()
}
