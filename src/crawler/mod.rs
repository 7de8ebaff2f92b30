//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Rate-limited HTTP fetching
//! - HTML link extraction
//! - Breadth-first crawl coordination

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{Coordinator, CrawlOptions};
pub use fetcher::{build_http_client, Fetcher, FetcherFactory, HttpFetcher, HttpFetcherFactory};
pub use parser::extract_links;

use crate::config::UserAgentConfig;
use crate::site::SiteMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Crawls a site and returns its map
///
/// This is the main entry point for a crawl. It will:
/// 1. Build an HTTP client with the default user agent
/// 2. Take a lease on the root host's limiter from the global registry
/// 3. Fetch pages breadth-first up to `max_depth`
/// 4. Release the limiter, whatever the outcome
///
/// # Arguments
///
/// * `cancel` - Cancels the crawl at the next queue pop
/// * `root_url` - Absolute URL the crawl starts from
/// * `timeout` - Network timeout for each fetch
/// * `rate_limit` - Requests per second against the root host
/// * `max_depth` - Deepest level to map, inclusive (root = 0)
///
/// # Example
///
/// ```no_run
/// use site_mapper::crawler::crawl;
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let cancel = CancellationToken::new();
/// let map = crawl(&cancel, "https://example.com/", Duration::from_secs(10), 5, 2).await?;
/// println!("Mapped {} pages", map.node_count());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    cancel: &CancellationToken,
    root_url: &str,
    timeout: Duration,
    rate_limit: u32,
    max_depth: usize,
) -> crate::Result<SiteMap> {
    let factory = HttpFetcherFactory::new(&UserAgentConfig::default())?;
    let options = CrawlOptions {
        timeout,
        rate_limit,
        max_depth,
    };

    Ok(Coordinator::new(factory)
        .crawl(cancel, root_url, &options)
        .await?)
}
