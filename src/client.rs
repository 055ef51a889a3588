//! Cloudflare API client
//!
//! [`CloudflareClient`] bundles the HTTP transport with the cancellation
//! token and optional retry policy shared by every resource handle.

use crate::cancel::CancellationToken;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{fetch_page, ListQuery, PageEnvelope, PageInfoExtractor, Paginator};
use crate::resources::{
    Accounts, AuditLogs, D1Databases, DnsRecords, Members, Memberships, R2Buckets,
    TurnstileWidgets,
};
use crate::retry::{with_retry, RetryPolicy};
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Boxed future returned by resource page fetchers
pub type PageFuture<'a, T> = BoxFuture<'a, Result<PageEnvelope<T>>>;

/// Boxed page fetcher used by resource streams
pub type PageFetcher<'a, T, Q> = Box<dyn FnMut(Q) -> PageFuture<'a, T> + Send + 'a>;

/// Item stream returned by resource `list` methods
pub type ListStream<'a, T, Q> = Paginator<T, Q, PageFetcher<'a, T, Q>, PageFuture<'a, T>>;

/// Entry point for the Cloudflare v4 API
#[derive(Debug, Clone)]
pub struct CloudflareClient {
    http: HttpClient,
    cancel: Option<CancellationToken>,
    retry: Option<RetryPolicy>,
}

impl CloudflareClient {
    /// Wrap an HTTP client
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            cancel: None,
            retry: None,
        }
    }

    /// Build a client from configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let http = HttpClient::with_auth(config.http_config(), config.auth.clone())?;
        Ok(Self {
            http,
            cancel: None,
            retry: config.retry_policy(),
        })
    }

    /// Abort in-flight and future calls once `token` fires
    #[must_use]
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Retry idempotent calls (listing, polling) with `policy`
    #[must_use]
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Get the underlying HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Get the cancellation token
    pub fn cancel_token(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    /// Get the retry policy
    pub fn retry_policy(&self) -> Option<&RetryPolicy> {
        self.retry.as_ref()
    }

    /// Request config carrying this client's cancellation token
    pub fn request(&self) -> RequestConfig {
        RequestConfig::new().cancel_opt(self.cancel.as_ref())
    }

    /// Accounts the credentials can see
    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(self)
    }

    /// Members of an account
    pub fn members(&self, account_id: impl Into<String>) -> Members<'_> {
        Members::new(self, account_id)
    }

    /// Memberships of the current user
    pub fn memberships(&self) -> Memberships<'_> {
        Memberships::new(self)
    }

    /// DNS records of a zone
    pub fn dns_records(&self, zone_id: impl Into<String>) -> DnsRecords<'_> {
        DnsRecords::new(self, zone_id)
    }

    /// Turnstile widgets of an account
    pub fn turnstile_widgets(&self, account_id: impl Into<String>) -> TurnstileWidgets<'_> {
        TurnstileWidgets::new(self, account_id)
    }

    /// D1 databases of an account
    pub fn d1(&self, account_id: impl Into<String>) -> D1Databases<'_> {
        D1Databases::new(self, account_id)
    }

    /// R2 buckets of an account
    pub fn r2_buckets(&self, account_id: impl Into<String>) -> R2Buckets<'_> {
        R2Buckets::new(self, account_id)
    }

    /// Audit logs of an account
    pub fn audit_logs(&self, account_id: impl Into<String>) -> AuditLogs<'_> {
        AuditLogs::new(self, account_id)
    }

    /// Fetch one page, retrying when a policy is configured
    pub async fn list_page<T, Q>(
        &self,
        path: &str,
        query: &Q,
        extractor: &dyn PageInfoExtractor,
    ) -> Result<PageEnvelope<T>>
    where
        T: DeserializeOwned,
        Q: ListQuery,
    {
        let cancel = self.cancel.as_ref();
        match &self.retry {
            Some(policy) => {
                with_retry(policy, cancel, || {
                    fetch_page(&self.http, path, query, extractor, cancel)
                })
                .await
            }
            None => fetch_page(&self.http, path, query, extractor, cancel).await,
        }
    }

    /// Stream every item of a list endpoint
    pub fn paginate<'a, T, Q>(
        &'a self,
        path: String,
        query: Q,
        extractor: Arc<dyn PageInfoExtractor>,
    ) -> ListStream<'a, T, Q>
    where
        T: DeserializeOwned + Send + 'a,
        Q: ListQuery + 'a,
    {
        let fetcher: PageFetcher<'a, T, Q> = Box::new(move |q: Q| -> PageFuture<'a, T> {
            let path = path.clone();
            let extractor = Arc::clone(&extractor);
            Box::pin(async move { self.list_page(&path, &q, extractor.as_ref()).await })
        });

        Paginator::new(query, fetcher).with_cancel(self.cancel.clone())
    }

    /// POST a JSON body and decode the envelope `result`, retrying when allowed
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
        retry: bool,
    ) -> Result<T> {
        let policy = self.retry.as_ref().filter(|_| retry);
        match policy {
            Some(policy) => {
                with_retry(policy, self.cancel.as_ref(), || {
                    self.http.post_result(path, body.clone(), self.request())
                })
                .await
            }
            None => self.http.post_result(path, body, self.request()).await,
        }
    }
}
