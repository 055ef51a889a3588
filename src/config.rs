//! Client configuration
//!
//! A [`ClientConfig`] is loaded from a YAML file or from the standard
//! `CLOUDFLARE_*` environment variables, then turned into the HTTP client
//! configuration, credentials and optional retry policy.

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig, CLOUDFLARE_API_BASE};
use crate::retry::RetryPolicy;
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Scoped API token
pub const ENV_API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";
/// Legacy Global API Key
pub const ENV_API_KEY: &str = "CLOUDFLARE_API_KEY";
/// Account email paired with the Global API Key
pub const ENV_EMAIL: &str = "CLOUDFLARE_EMAIL";
/// Default account for account-scoped resources
pub const ENV_ACCOUNT_ID: &str = "CLOUDFLARE_ACCOUNT_ID";
/// API base URL override
pub const ENV_BASE_URL: &str = "CLOUDFLARE_BASE_URL";

// ============================================================================
// Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default credentials
    #[serde(default)]
    pub auth: AuthConfig,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Client-side rate limit, `null` to disable
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimiterConfig>,

    /// User agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Default account for account-scoped resources
    #[serde(default)]
    pub account_id: Option<String>,

    /// Retry settings for idempotent calls
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth: AuthConfig::None,
            timeout_secs: default_timeout(),
            rate_limit: default_rate_limit(),
            user_agent: default_user_agent(),
            account_id: None,
            retry: RetryConfig::default(),
        }
    }
}

fn default_base_url() -> String {
    CLOUDFLARE_API_BASE.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_rate_limit() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}

fn default_user_agent() -> String {
    format!("cloudflare-sdk/{}", env!("CARGO_PKG_VERSION"))
}

impl ClientConfig {
    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_yaml_str(&content)
    }

    /// Parse from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup
    ///
    /// A token wins over a Global API Key when both are present.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let auth = match (var(ENV_API_TOKEN), var(ENV_API_KEY), var(ENV_EMAIL)) {
            (Some(token), _, _) => AuthConfig::bearer(token),
            (None, Some(key), Some(email)) => AuthConfig::global_api_key(email, key),
            (None, Some(_), None) => return Err(Error::missing_field(ENV_EMAIL)),
            (None, None, _) => AuthConfig::None,
        };

        let config = Self {
            base_url: var(ENV_BASE_URL).unwrap_or_else(default_base_url),
            auth,
            account_id: var(ENV_ACCOUNT_ID),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise from the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_env(),
        }
    }

    /// Check field values
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("Invalid base_url '{}': {e}", self.base_url)))?;

        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than 0"));
        }

        if let Some(limit) = &self.rate_limit {
            if limit.requests_per_second == 0 {
                return Err(Error::config(
                    "rate_limit.requests_per_second must be greater than 0",
                ));
            }
        }

        if self.retry.max_attempts == 0 {
            return Err(Error::config("retry.max_attempts must be at least 1"));
        }

        Ok(())
    }

    /// Account id, or an error naming the missing setting
    pub fn require_account_id(&self) -> Result<&str> {
        self.account_id
            .as_deref()
            .ok_or_else(|| Error::missing_field("account_id"))
    }

    /// HTTP client configuration
    pub fn http_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .user_agent(&self.user_agent);

        match &self.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        }
        .build()
    }

    /// Retry policy, `None` when retries are disabled
    pub fn retry_policy(&self) -> Option<RetryPolicy> {
        self.retry.to_policy()
    }
}

// ============================================================================
// Retry Config
// ============================================================================

/// Retry settings
///
/// Retries are off by default (`max_attempts: 1`); the client never repeats
/// a request unless configured to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Backoff strategy
    #[serde(default)]
    pub backoff: BackoffType,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// HTTP statuses to retry on
    #[serde(default = "default_retry_statuses")]
    pub statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
            backoff: BackoffType::default(),
            max_delay_ms: default_max_delay_ms(),
            statuses: default_retry_statuses(),
        }
    }
}

fn default_max_attempts() -> u32 {
    1
}

fn default_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_retry_statuses() -> Vec<u16> {
    vec![500, 502, 503, 504]
}

impl RetryConfig {
    /// Build the policy, `None` when only one attempt is allowed
    pub fn to_policy(&self) -> Option<RetryPolicy> {
        if self.max_attempts <= 1 {
            return None;
        }

        Some(
            RetryPolicy::new(self.max_attempts)
                .delay(Duration::from_millis(self.delay_ms))
                .backoff(self.backoff, Duration::from_millis(self.max_delay_ms))
                .retry_on(&self.statuses),
        )
    }
}
