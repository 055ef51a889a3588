//! Authentication module
//!
//! Supports: API Token (Bearer), Global API Key + Email, User Service Key
//!
//! Cloudflare still requires the legacy Global API Key for a handful of
//! verbs (account member updates, zone holds) where API tokens answer
//! 403/405, so the scheme can be chosen per request as well as per client.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::AuthConfig;
