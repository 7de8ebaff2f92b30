//! Site-Mapper: a depth-bounded site map crawler
//!
//! This crate crawls a website breadth-first from a root URL, follows links up to
//! a maximum depth, and produces a de-duplicated tree of the site's link structure.

pub mod config;
pub mod crawler;
pub mod limiter;
pub mod output;
pub mod site;
pub mod url;

use thiserror::Error;

/// Error type of the top-level [`crawl`] entry point
#[derive(Debug, Error)]
pub enum SiteMapperError {
    #[error(transparent)]
    Crawl(#[from] CrawlError),

    #[error("Fetcher error: {0}")]
    Fetch(#[from] FetchError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
///
/// Every variant means the link string could not be turned into an absolute,
/// normalized address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] ::url::ParseError),

    #[error("Relative URL '{0}' has no parent to resolve against")]
    RelativeWithoutBase(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Why a candidate node was turned away by the site map
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidNode {
    #[error("depth {depth} exceeds max depth {max_depth}")]
    DepthExceeded { depth: usize, max_depth: usize },

    #[error("url '{0}' is already in the site map")]
    Duplicate(String),
}

/// Site map insertion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiteMapError {
    /// Expected rejection: duplicate URL or depth exceeded
    #[error("invalid node: {0}")]
    InvalidNode(#[from] InvalidNode),

    #[error("parent node {0} is not in the site map")]
    UnknownParent(site::NodeId),

    #[error("candidate depth {candidate} does not follow parent depth {parent}")]
    DepthMismatch { parent: usize, candidate: usize },
}

impl SiteMapError {
    /// Returns true for the expected, recoverable rejections
    pub fn is_invalid_node(&self) -> bool {
        matches!(self, Self::InvalidNode(_))
    }
}

/// Errors produced while fetching a single page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}")]
    Connect { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got '{content_type}'")]
    ContentMismatch { url: String, content_type: String },

    #[error("Rate limiter for {hostname} has been stopped")]
    LimiterStopped { hostname: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}

/// Terminal crawl failures
///
/// A crawl either returns a complete site map or exactly one of these.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("parsing url '{url}': {source}")]
    RootUrl { url: String, source: UrlError },

    #[error("aborted after {fetched} url fetches")]
    Cancelled { fetched: usize },
}

/// Result type alias for Site-Mapper operations
pub type Result<T> = std::result::Result<T, SiteMapperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator, CrawlOptions};
pub use site::{NodeId, SiteMap, UrlNode};
pub use url::{extract_host, resolve_url};
