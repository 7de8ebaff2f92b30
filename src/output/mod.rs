//! Output module for rendering finished site maps
//!
//! This module handles:
//! - Rendering the site map as an indented text tree
//! - Generating markdown reports
//! - Exporting the nested tree as JSON
//! - Computing site map statistics

mod markdown;
pub mod stats;
mod tree;

pub use markdown::{format_markdown, generate_markdown};
pub use stats::{print_statistics, SiteMapStatistics};
pub use tree::render_tree;

use crate::site::SiteMap;
use serde::Deserialize;
use std::fmt;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize site map: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Rendering of a finished site map
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented text tree, one URL per line
    #[default]
    Tree,
    /// Markdown report with statistics
    Markdown,
    /// Nested JSON tree
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tree => "tree",
            Self::Markdown => "markdown",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

/// Renders a site map in the requested format
pub fn render(site_map: &SiteMap, format: OutputFormat) -> OutputResult<String> {
    match format {
        OutputFormat::Tree => Ok(render_tree(site_map)),
        OutputFormat::Markdown => Ok(generate_markdown(site_map)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&site_map.to_tree())?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Writes a rendered site map to a file, or to stdout when no path is given
pub fn write_output(
    site_map: &SiteMap,
    format: OutputFormat,
    path: Option<&Path>,
) -> OutputResult<()> {
    let rendered = render(site_map, format)?;

    match path {
        Some(path) => std::fs::write(path, rendered)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn create_test_map() -> SiteMap {
        let mut map = SiteMap::new(Url::parse("https://example.com/").unwrap(), 1);
        let root = map.root();
        let child = map
            .root_node()
            .child(Url::parse("https://example.com/about").unwrap());
        map.add_child(root, child).unwrap();
        map
    }

    #[test]
    fn test_render_json() {
        let json = render(&create_test_map(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["url"], "https://example.com/");
        assert_eq!(value["children"][0]["url"], "https://example.com/about");
        assert_eq!(value["children"][0]["depth"], 1);
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.txt");

        write_output(&create_test_map(), OutputFormat::Tree, Some(&path)).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("https://example.com/about"));
    }

    #[test]
    fn test_format_display() {
        assert_eq!(OutputFormat::Tree.to_string(), "tree");
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
