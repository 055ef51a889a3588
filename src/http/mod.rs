//! HTTP client module
//!
//! Provides the Cloudflare transport: envelope validation, authentication,
//! rate limiting and cancellation.
//!
//! # Features
//!
//! - **Envelope handling**: `success = false` and non-2xx become [`crate::Error::Api`]
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Authentication**: Bearer token or Global API Key, selectable per request
//! - **No implicit retries**: see [`crate::retry`]

mod client;
mod envelope;
mod rate_limit;

pub use client::{
    HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig, CLOUDFLARE_API_BASE,
};
pub use envelope::{check_envelope, error_from_body, Envelope};
pub use rate_limit::{RateLimiter, RateLimiterConfig, CLOUDFLARE_REQUESTS_PER_FIVE_MINUTES};
