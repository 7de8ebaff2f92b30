use crate::crawler::CrawlOptions;
use crate::output::OutputFormat;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Site-Mapper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from (may instead be given on the command line)
    #[serde(rename = "root-url", default)]
    pub root_url: Option<String>,

    /// Maximum depth to crawl from the root URL (inclusive)
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: usize,

    /// Network timeout for each page fetch (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum requests per second against the root host
    #[serde(rename = "rate-limit", default = "default_rate_limit")]
    pub rate_limit: u32,
}

impl CrawlerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn crawl_options(&self) -> CrawlOptions {
        CrawlOptions {
            timeout: self.timeout(),
            rate_limit: self.rate_limit,
            max_depth: self.max_depth,
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            root_url: None,
            max_depth: default_max_depth(),
            timeout_secs: default_timeout_secs(),
            rate_limit: default_rate_limit(),
        }
    }
}

fn default_max_depth() -> usize {
    2
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_rate_limit() -> u32 {
    5
}

/// User agent identification configuration
///
/// Missing keys fall back to the Site-Mapper defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version (+ContactURL; ContactEmail)
    pub fn user_agent_string(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SiteMapper".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/site-mapper".to_string(),
            contact_email: "site-mapper@example.com".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// How the finished site map is rendered
    #[serde(default)]
    pub format: OutputFormat,

    /// File to write the rendered map to (stdout when absent)
    #[serde(default)]
    pub path: Option<String>,
}
