//! Client-side rate limiting
//!
//! Token bucket from the governor crate. The default quota tracks Cloudflare's
//! global limit of 1200 requests per five minutes (4 per second) and lets a
//! short listing burst through before throttling.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Cloudflare's account-wide request budget per five-minute window
pub const CLOUDFLARE_REQUESTS_PER_FIVE_MINUTES: u32 = 1200;

/// Configuration for rate limiting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Sustained requests per second
    pub requests_per_second: u32,
    /// Requests allowed back to back before throttling starts
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_second: CLOUDFLARE_REQUESTS_PER_FIVE_MINUTES / 300,
            burst_size: 20,
        }
    }
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }

    /// Share the global budget between `clients` processes using one account
    ///
    /// Each share keeps at least one request per second.
    pub fn shared(clients: u32) -> Self {
        let clients = clients.max(1);
        let rps = (CLOUDFLARE_REQUESTS_PER_FIVE_MINUTES / 300 / clients).max(1);
        Self::new(rps, (20 / clients).max(1))
    }

    fn quota(&self) -> Quota {
        // Zero would panic inside governor; clamp to the smallest quota.
        let rps = NonZeroU32::new(self.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.burst_size).unwrap_or(NonZeroU32::MIN);
        Quota::per_second(rps).allow_burst(burst)
    }
}

type DirectLimiter = Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Token bucket shared by every clone of an [`super::HttpClient`]
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<DirectLimiter>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            limiter: Arc::new(Governor::direct(config.quota())),
        }
    }

    /// Wait for a permit
    ///
    /// Callers race this against their cancellation token, so the wait needs
    /// no timeout of its own.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Take a permit if one is free right now
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}
