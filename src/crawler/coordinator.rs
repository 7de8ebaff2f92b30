//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop. It owns the frontier
//! queue and the site map for the duration of one crawl, and drives the
//! fetcher through the root host's rate limiter.

use crate::crawler::fetcher::{Fetcher, FetcherFactory};
use crate::limiter::RateLimiterRegistry;
use crate::site::{NodeId, SiteMap, UrlNode};
use crate::url::resolve_url;
use crate::CrawlError;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Parameters of a single crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Network timeout for each fetch
    pub timeout: Duration,

    /// Requests per second against the root host (0 disables throttling)
    pub rate_limit: u32,

    /// Deepest level a node may sit at, inclusive (root = 0)
    pub max_depth: usize,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            rate_limit: 5,
            max_depth: 2,
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator<F> {
    factory: F,
    registry: Arc<RateLimiterRegistry>,
}

impl<F: FetcherFactory> Coordinator<F> {
    /// Creates a coordinator that throttles through the global registry
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            registry: RateLimiterRegistry::global(),
        }
    }

    /// Uses a private limiter registry instead of the global one
    pub fn with_registry(mut self, registry: Arc<RateLimiterRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &Arc<RateLimiterRegistry> {
        &self.registry
    }

    /// Crawls a site breadth-first from `root_url`
    ///
    /// The loop:
    /// 1. Stops with `CrawlError::Cancelled` if `cancel` has fired
    /// 2. Returns the site map once the queue is empty
    /// 3. Pops the oldest queued node and fetches it (rate limited)
    /// 4. Resolves every returned link against the node's URL and offers it
    ///    to the site map; accepted children join the back of the queue
    ///
    /// Fetch failures, unparsable links and rejected nodes are logged and
    /// skipped. Cancellation is only observed between fetches.
    ///
    /// # Returns
    ///
    /// * `Ok(SiteMap)` - The queue drained; the map is complete
    /// * `Err(CrawlError::RootUrl)` - `root_url` could not be parsed
    /// * `Err(CrawlError::Cancelled)` - Aborted, with the count of successful fetches
    pub async fn crawl(
        &self,
        cancel: &CancellationToken,
        root_url: &str,
        options: &CrawlOptions,
    ) -> Result<SiteMap, CrawlError> {
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawler for url '{}' and depth {}",
            root_url,
            options.max_depth
        );

        let root = resolve_url(None, root_url).map_err(|source| CrawlError::RootUrl {
            url: root_url.to_string(),
            source,
        })?;
        let mut site_map = SiteMap::new(root, options.max_depth);

        // Released when this function returns, on every path
        let hostname = site_map.root_node().host_name().unwrap_or_default();
        let lease = self.registry.lease(&hostname, options.rate_limit);
        let fetcher = self.factory.connect(lease.handle().clone(), options.timeout);

        let mut queue = VecDeque::from([site_map.root()]);
        let mut fetched = 0;

        loop {
            if cancel.is_cancelled() {
                tracing::info!(
                    "Crawl of '{}' cancelled after fetching {} urls",
                    root_url,
                    fetched
                );
                return Err(CrawlError::Cancelled { fetched });
            }

            let Some(parent) = queue.pop_front() else {
                tracing::info!(
                    "Crawling request for '{}' finished in {:?} after fetching {} urls",
                    root_url,
                    start_time.elapsed(),
                    fetched
                );
                return Ok(site_map);
            };

            let Some(parent_node) = site_map.node(parent).cloned() else {
                tracing::error!("Queued node {} is missing from the site map", parent);
                continue;
            };

            tracing::debug!("Processing URL: {}", parent_node);

            let links = match fetcher.fetch(parent_node.key()).await {
                Ok(links) => {
                    fetched += 1;
                    links
                }
                Err(e) => {
                    tracing::error!("Fetching url '{}': {}", parent_node.url(), e);
                    continue;
                }
            };

            enqueue_links(&mut site_map, &mut queue, parent, &parent_node, &links);

            if fetched % 10 == 0 {
                tracing::info!(
                    "Progress: {} urls fetched, {} in queue, {} mapped",
                    fetched,
                    queue.len(),
                    site_map.node_count()
                );
            }
        }
    }
}

/// Offers each raw link to the site map as a child of `parent`
fn enqueue_links(
    site_map: &mut SiteMap,
    queue: &mut VecDeque<NodeId>,
    parent: NodeId,
    parent_node: &UrlNode,
    links: &[String],
) {
    for raw in links {
        let url = match resolve_url(Some(parent_node.url()), raw) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Parsing url '{}': {}", raw, e);
                continue;
            }
        };

        match site_map.add_child(parent, parent_node.child(url)) {
            Ok(child) => queue.push_back(child),
            Err(e) if e.is_invalid_node() => {
                tracing::debug!("Url '{}' skipped due to: {}", raw, e);
            }
            Err(e) => {
                tracing::error!("Url '{}' skipped due to: {}", raw, e);
            }
        }
    }
}
