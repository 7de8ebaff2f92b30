//! Markdown report generation
//!
//! This module generates human-readable markdown reports of a site map,
//! including statistics and the nested link structure.

use crate::output::stats::SiteMapStatistics;
use crate::site::{NodeId, SiteMap};
use chrono::{DateTime, Utc};

/// Generates a markdown report stamped with the current time
pub fn generate_markdown(site_map: &SiteMap) -> String {
    format_markdown(site_map, Utc::now())
}

/// Formats a site map as markdown
///
/// # Arguments
///
/// * `site_map` - The finished site map
/// * `generated_at` - Timestamp written into the report header
pub fn format_markdown(site_map: &SiteMap, generated_at: DateTime<Utc>) -> String {
    let stats = SiteMapStatistics::from_site_map(site_map);
    let mut md = String::new();

    // Title
    md.push_str(&format!("# Site Map: {}\n\n", stats.root_url));

    // Crawl metadata
    md.push_str("## Crawl Information\n\n");
    md.push_str(&format!("- **Root URL**: {}\n", stats.root_url));
    md.push_str(&format!("- **Max Depth**: {}\n", stats.max_depth));
    md.push_str(&format!(
        "- **Generated**: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Total Pages**: {}\n", stats.total_pages));
    md.push_str(&format!("- **Leaf Pages**: {}\n", stats.leaf_pages));
    md.push_str(&format!("- **Unique Hosts**: {}\n", stats.unique_hosts()));
    md.push_str(&format!("- **Deepest Level**: {}\n\n", stats.deepest_level));

    // Depth breakdown
    md.push_str("## Depth Breakdown\n\n");
    md.push_str("| Depth | Pages |\n");
    md.push_str("|-------|-------|\n");
    for (depth, count) in &stats.pages_by_depth {
        md.push_str(&format!("| {} | {} |\n", depth, count));
    }
    md.push('\n');

    // Host breakdown
    md.push_str("## Hosts\n\n");
    md.push_str("| Host | Pages |\n");
    md.push_str("|------|-------|\n");
    for (host, count) in &stats.pages_by_host {
        md.push_str(&format!("| {} | {} |\n", host, count));
    }
    md.push('\n');

    // Link structure
    md.push_str("## Link Structure\n\n");
    let mut stack: Vec<NodeId> = vec![site_map.root()];
    while let Some(id) = stack.pop() {
        if let Some(node) = site_map.node(id) {
            md.push_str(&format!(
                "{}- [{}]({})\n",
                "  ".repeat(node.depth()),
                node.url().path(),
                node.key()
            ));
        }
        stack.extend(site_map.children(id).iter().rev().copied());
    }

    md
}
