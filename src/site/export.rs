use crate::site::{NodeId, SiteMap};
use serde::Serialize;

/// Nested view of a finished site map, the shape used for JSON export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteTree {
    pub url: String,
    pub depth: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SiteTree>,
}

impl SiteTree {
    pub(crate) fn build(map: &SiteMap, id: NodeId) -> Self {
        let (url, depth) = map
            .node(id)
            .map(|node| (node.key().to_string(), node.depth()))
            .unwrap_or_default();

        Self {
            url,
            depth,
            children: map
                .children(id)
                .iter()
                .map(|&child| Self::build(map, child))
                .collect(),
        }
    }

    /// Total number of nodes in this subtree, itself included
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SiteTree::node_count).sum::<usize>()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
