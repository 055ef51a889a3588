//! Authenticator implementation
//!
//! Applies the configured credentials to outgoing requests.

use super::types::{
    AuthConfig, AUTH_EMAIL_HEADER, AUTH_KEY_HEADER, AUTH_USER_SERVICE_KEY_HEADER,
};
use reqwest::RequestBuilder;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Get the auth configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        apply_auth(&self.config, req)
    }

    /// Apply authentication, preferring a per-request override
    pub fn apply_with_override(
        &self,
        req: RequestBuilder,
        override_config: Option<&AuthConfig>,
    ) -> RequestBuilder {
        apply_auth(override_config.unwrap_or(&self.config), req)
    }
}

fn apply_auth(config: &AuthConfig, req: RequestBuilder) -> RequestBuilder {
    match config {
        AuthConfig::None => req,
        AuthConfig::Bearer { token } => req.bearer_auth(token),
        AuthConfig::GlobalApiKey { email, key } => req
            .header(AUTH_EMAIL_HEADER, email.as_str())
            .header(AUTH_KEY_HEADER, key.as_str()),
        AuthConfig::UserServiceKey { key } => {
            req.header(AUTH_USER_SERVICE_KEY_HEADER, key.as_str())
        }
    }
}
