//! Site-Mapper main entry point
//!
//! This is the command-line interface for the Site-Mapper crawler.

use anyhow::{bail, Context, Result};
use clap::Parser;
use site_mapper::config::{load_config, validate, Config};
use site_mapper::crawler::{Coordinator, HttpFetcherFactory};
use site_mapper::output::{print_statistics, write_output, OutputFormat, SiteMapStatistics};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Site-Mapper: A polite single-site crawler
///
/// Site-Mapper crawls breadth-first from a root URL, rate limited against
/// the root host, and prints the tree of pages it discovered.
#[derive(Parser, Debug)]
#[command(name = "site-mapper")]
#[command(version)]
#[command(about = "Maps the link structure of a site", long_about = None)]
struct Cli {
    /// URL to start crawling from (overrides `root-url` in the config)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum depth to crawl, root = 0
    #[arg(short, long)]
    depth: Option<usize>,

    /// Network timeout for each fetch, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Requests per second against the root host
    #[arg(long)]
    rate_limit: Option<u32>,

    /// Abort the crawl after this many seconds
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the site map to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print crawl statistics after the site map
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    if let Err(e) = handle_crawl(&cli, config).await {
        tracing::error!("Crawl failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_mapper=info,warn"),
            1 => EnvFilter::new("site_mapper=debug,info"),
            2 => EnvFilter::new("site_mapper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("reading config file {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(url) = &cli.url {
        config.crawler.root_url = Some(url.clone());
    }
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.crawler.timeout_secs = timeout_secs;
    }
    if let Some(rate_limit) = cli.rate_limit {
        config.crawler.rate_limit = rate_limit;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(output) = &cli.output {
        config.output.path = Some(output.display().to_string());
    }

    validate(&config).context("invalid settings")?;

    if config.crawler.root_url.is_none() {
        bail!("no root URL given: pass one on the command line or set crawler.root-url");
    }

    Ok(config)
}

/// Cancels the returned token on Ctrl-C or when the deadline passes
fn spawn_cancellation(deadline: Option<Duration>) -> CancellationToken {
    let cancel = CancellationToken::new();

    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            token.cancel();
        }
    });

    if let Some(deadline) = deadline {
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            tracing::warn!("Deadline of {}s reached, stopping crawl", deadline.as_secs());
            token.cancel();
        });
    }

    cancel
}

/// Handles the main crawl operation
async fn handle_crawl(cli: &Cli, config: Config) -> Result<()> {
    let root_url = config.crawler.root_url.clone().unwrap_or_default();
    let options = config.crawler.crawl_options();

    tracing::info!(
        "Mapping {} (max depth {}, {} req/s)",
        root_url,
        options.max_depth,
        options.rate_limit
    );

    let factory =
        HttpFetcherFactory::new(&config.user_agent).context("building HTTP client")?;
    let cancel = spawn_cancellation(cli.deadline_secs.map(Duration::from_secs));

    let site_map = Coordinator::new(factory)
        .crawl(&cancel, &root_url, &options)
        .await?;

    tracing::info!("Crawl completed: {} pages mapped", site_map.node_count());

    let output_path = config.output.path.as_deref().map(Path::new);
    write_output(&site_map, config.output.format, output_path)
        .context("writing site map")?;

    if let Some(path) = output_path {
        tracing::info!("Site map written to: {}", path.display());
    }

    if cli.stats {
        print_statistics(&SiteMapStatistics::from_site_map(&site_map));
    }

    Ok(())
}
