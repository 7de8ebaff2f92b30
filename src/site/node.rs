use crate::url::extract_host;
use std::fmt;
use std::hash::{Hash, Hasher};
use url::Url;

/// One entry in the site map
///
/// Nodes are immutable once created. Two nodes are the same site map entity
/// when their normalized URLs are equal, whatever their depth.
#[derive(Debug, Clone)]
pub struct UrlNode {
    url: Url,
    depth: usize,
}

impl UrlNode {
    /// Creates a node for an already normalized URL
    pub fn new(url: Url, depth: usize) -> Self {
        Self { url, depth }
    }

    /// Creates the node for a link discovered on this page
    pub fn child(&self, url: Url) -> Self {
        Self::new(url, self.depth + 1)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Distance from the root (root = 0)
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Lowercase hostname of the node's URL
    pub fn host_name(&self) -> Option<String> {
        extract_host(&self.url)
    }

    /// The identity string used for duplicate suppression
    pub fn key(&self) -> &str {
        self.url.as_str()
    }
}

impl PartialEq for UrlNode {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for UrlNode {}

impl Hash for UrlNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
    }
}

impl fmt::Display for UrlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (depth {})", self.url, self.depth)
    }
}
