//! Statistics over a finished site map
//!
//! This module summarizes the shape of a crawl result: how many pages sit at
//! each depth and on each host.

use crate::site::SiteMap;
use std::collections::BTreeMap;

/// Site map statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMapStatistics {
    /// The root URL the crawl started from
    pub root_url: String,

    /// Configured maximum depth
    pub max_depth: usize,

    /// Total number of nodes, root included
    pub total_pages: usize,

    /// Nodes without children (dead ends, depth-bounded pages, failed fetches)
    pub leaf_pages: usize,

    /// Deepest level actually reached
    pub deepest_level: usize,

    /// Count of nodes per depth
    pub pages_by_depth: BTreeMap<usize, usize>,

    /// Count of nodes per hostname
    pub pages_by_host: BTreeMap<String, usize>,
}

impl SiteMapStatistics {
    /// Computes statistics by walking the site map once
    pub fn from_site_map(site_map: &SiteMap) -> Self {
        let mut pages_by_depth = BTreeMap::new();
        let mut pages_by_host = BTreeMap::new();
        let mut leaf_pages = 0;

        for (id, node) in site_map.iter() {
            *pages_by_depth.entry(node.depth()).or_insert(0) += 1;

            let host = node.host_name().unwrap_or_default();
            *pages_by_host.entry(host).or_insert(0) += 1;

            if site_map.children(id).is_empty() {
                leaf_pages += 1;
            }
        }

        Self {
            root_url: site_map.root_node().key().to_string(),
            max_depth: site_map.max_depth(),
            total_pages: site_map.node_count(),
            leaf_pages,
            deepest_level: pages_by_depth.keys().next_back().copied().unwrap_or(0),
            pages_by_depth,
            pages_by_host,
        }
    }

    pub fn unique_hosts(&self) -> usize {
        self.pages_by_host.len()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &SiteMapStatistics) {
    println!("=== Site Map Statistics ===\n");

    println!("Overview:");
    println!("  Root URL: {}", stats.root_url);
    println!("  Total pages mapped: {}", stats.total_pages);
    println!("  Leaf pages: {}", stats.leaf_pages);
    println!("  Unique hosts: {}", stats.unique_hosts());
    println!(
        "  Deepest level: {} (max {})",
        stats.deepest_level, stats.max_depth
    );
    println!();

    println!("Pages by Depth:");
    for (depth, count) in &stats.pages_by_depth {
        let percentage = (*count as f64 / stats.total_pages as f64) * 100.0;
        println!("  {}: {} ({:.1}%)", depth, count, percentage);
    }
    println!();

    println!("Pages by Host ({}):", stats.unique_hosts());
    // Sort hosts by count (descending)
    let mut host_counts: Vec<_> = stats.pages_by_host.iter().collect();
    host_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (host, count) in host_counts {
        println!("  - {}: {}", host, count);
    }
}
