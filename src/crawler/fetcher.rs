//! HTTP fetcher implementation
//!
//! This module handles all network access for the crawler:
//! - The `Fetcher` seam the coordinator drives, and its factory
//! - Building HTTP clients with proper user agent strings
//! - Rate-limited GET requests with a per-request timeout
//! - Error classification
//! - Handing the body to the link extractor

use crate::config::UserAgentConfig;
use crate::crawler::parser::extract_links;
use crate::limiter::LimiterHandle;
use crate::{FetchError, FetchResult};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Content types the link extractor understands
const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Fetches one page and returns the raw link strings found on it
///
/// Implementations honor the rate limiter and timeout they were built with.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult<Vec<String>>;
}

/// Builds the fetcher a crawl uses, bound to that crawl's limiter and timeout
pub trait FetcherFactory {
    type Fetcher: Fetcher;

    fn connect(&self, limiter: LimiterHandle, timeout: Duration) -> Self::Fetcher;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use site_mapper::config::UserAgentConfig;
/// use site_mapper::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> FetchResult<Client> {
    Client::builder()
        .user_agent(config.user_agent_string())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(FetchError::Client)
}

/// Factory for [`HttpFetcher`]s sharing one connection pool
#[derive(Debug, Clone)]
pub struct HttpFetcherFactory {
    client: Client,
}

impl HttpFetcherFactory {
    pub fn new(config: &UserAgentConfig) -> FetchResult<Self> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl FetcherFactory for HttpFetcherFactory {
    type Fetcher = HttpFetcher;

    fn connect(&self, limiter: LimiterHandle, timeout: Duration) -> HttpFetcher {
        HttpFetcher {
            client: self.client.clone(),
            limiter,
            timeout,
        }
    }
}

/// Rate-limited HTML fetcher backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    limiter: LimiterHandle,
    timeout: Duration,
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a page and extracts its links
    ///
    /// # Request Flow
    ///
    /// 1. Wait for a permit from the host's rate limiter
    /// 2. Send GET with the crawl timeout (redirects followed, max 10 hops)
    /// 3. Reject non-success statuses and non-HTML content types
    /// 4. Read the body and extract raw links
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Timeout | `FetchError::Timeout` |
    /// | Connection refused | `FetchError::Connect` |
    /// | HTTP 4xx/5xx | `FetchError::Status` |
    /// | Content-Type not HTML | `FetchError::ContentMismatch` |
    /// | Limiter released | `FetchError::LimiterStopped` |
    async fn fetch(&self, url: &str) -> FetchResult<Vec<String>> {
        self.limiter.acquire().await?;

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if !HTML_CONTENT_TYPES.iter().any(|t| content_type.contains(t)) {
            return Err(FetchError::ContentMismatch {
                url: url.to_string(),
                content_type,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, e))?;

        let links = extract_links(&body);
        tracing::trace!("Extracted {} links from {}", links.len(), url);

        Ok(links)
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&UserAgentConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_stopped_limiter_short_circuits() {
        let factory = HttpFetcherFactory::new(&UserAgentConfig::default()).unwrap();
        let registry = crate::limiter::RateLimiterRegistry::new();
        let limiter = registry.lease("127.0.0.1", 0).handle().clone();

        let fetcher = factory.connect(limiter, Duration::from_secs(1));
        let err = fetcher.fetch("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, FetchError::LimiterStopped { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let factory = HttpFetcherFactory::new(&UserAgentConfig::default()).unwrap();
        let registry = crate::limiter::RateLimiterRegistry::new();
        let lease = registry.lease("127.0.0.1", 0);

        let fetcher = factory.connect(lease.handle().clone(), Duration::from_secs(2));
        // Port 9 (discard) is not expected to be listening
        let err = fetcher.fetch("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Connect { .. } | FetchError::Http { .. } | FetchError::Timeout { .. }
        ));
    }
}
