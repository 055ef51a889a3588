//! Auth configuration types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Header carrying the account email for Global API Key auth
pub const AUTH_EMAIL_HEADER: &str = "X-Auth-Email";

/// Header carrying the Global API Key
pub const AUTH_KEY_HEADER: &str = "X-Auth-Key";

/// Header carrying an Origin CA user service key
pub const AUTH_USER_SERVICE_KEY_HEADER: &str = "X-Auth-User-Service-Key";

/// Authentication configuration
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,

    /// Scoped API token sent as `Authorization: Bearer <token>`
    Bearer {
        /// The API token
        token: String,
    },

    /// Legacy Global API Key plus account email
    GlobalApiKey {
        /// Account email
        email: String,
        /// Global API key
        key: String,
    },

    /// Origin CA user service key
    UserServiceKey {
        /// The service key
        key: String,
    },
}

impl AuthConfig {
    /// Create bearer token auth
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Create Global API Key auth
    pub fn global_api_key(email: impl Into<String>, key: impl Into<String>) -> Self {
        Self::GlobalApiKey {
            email: email.into(),
            key: key.into(),
        }
    }

    /// Short name of the scheme, safe to log
    pub fn scheme(&self) -> &'static str {
        match self {
            AuthConfig::None => "none",
            AuthConfig::Bearer { .. } => "bearer",
            AuthConfig::GlobalApiKey { .. } => "global_api_key",
            AuthConfig::UserServiceKey { .. } => "user_service_key",
        }
    }

    /// Check whether any credentials are configured
    pub fn is_none(&self) -> bool {
        matches!(self, AuthConfig::None)
    }
}

// Secrets stay out of Debug output.
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthConfig::None => f.write_str("None"),
            AuthConfig::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
            AuthConfig::GlobalApiKey { email, .. } => f
                .debug_struct("GlobalApiKey")
                .field("email", email)
                .finish_non_exhaustive(),
            AuthConfig::UserServiceKey { .. } => {
                f.debug_struct("UserServiceKey").finish_non_exhaustive()
            }
        }
    }
}
