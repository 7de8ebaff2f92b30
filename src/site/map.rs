use crate::site::{SiteTree, UrlNode};
use crate::{InvalidNode, SiteMapError};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use url::Url;

/// Index of a node inside a [`SiteMap`]
///
/// Ids are only meaningful for the site map that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in insertion order (root = 0)
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    node: UrlNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Depth-bounded tree of discovered URLs
///
/// Nodes live by value in a growable arena and refer to each other by
/// [`NodeId`]. The structure maintains these invariants:
///
/// - every node's depth is its parent's depth + 1, the root sits at depth 0
/// - no node is deeper than `max_depth` (inclusive)
/// - each normalized URL appears at most once in the whole tree
/// - every node except the root has a parent already in the tree
///
/// [`SiteMap::add_child`] is the only way the tree grows.
#[derive(Debug, Clone)]
pub struct SiteMap {
    entries: Vec<Entry>,

    /// Normalized URL -> node, consulted on every insertion
    index: HashMap<String, NodeId>,

    max_depth: usize,
}

impl SiteMap {
    /// Creates a site map holding only the root node at depth 0
    ///
    /// `max_depth` is an inclusive bound: 0 allows nothing but the root.
    pub fn new(root_url: Url, max_depth: usize) -> Self {
        let root = UrlNode::new(root_url, 0);
        let mut index = HashMap::new();
        index.insert(root.key().to_string(), NodeId(0));

        Self {
            entries: vec![Entry {
                node: root,
                parent: None,
                children: Vec::new(),
            }],
            index,
            max_depth,
        }
    }

    /// Adds `candidate` as a new leaf under `parent`
    ///
    /// # Errors
    ///
    /// * `SiteMapError::InvalidNode` - candidate is deeper than `max_depth`, or
    ///   its URL is already in the tree (first discovery wins)
    /// * `SiteMapError::UnknownParent` - `parent` is not a node of this map
    /// * `SiteMapError::DepthMismatch` - candidate depth is not parent depth + 1
    pub fn add_child(
        &mut self,
        parent: NodeId,
        candidate: UrlNode,
    ) -> Result<NodeId, SiteMapError> {
        let parent_depth = self
            .depth_of(parent)
            .ok_or(SiteMapError::UnknownParent(parent))?;

        if candidate.depth() != parent_depth + 1 {
            return Err(SiteMapError::DepthMismatch {
                parent: parent_depth,
                candidate: candidate.depth(),
            });
        }

        if candidate.depth() > self.max_depth {
            return Err(InvalidNode::DepthExceeded {
                depth: candidate.depth(),
                max_depth: self.max_depth,
            }
            .into());
        }

        if self.index.contains_key(candidate.key()) {
            return Err(InvalidNode::Duplicate(candidate.key().to_string()).into());
        }

        let id = NodeId(self.entries.len());
        self.index.insert(candidate.key().to_string(), id);
        self.entries.push(Entry {
            node: candidate,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.entries[parent.0].children.push(id);

        Ok(id)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root_node(&self) -> &UrlNode {
        &self.entries[0].node
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.entries.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&UrlNode> {
        self.entries.get(id.0).map(|e| &e.node)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entries.get(id.0).and_then(|e| e.parent)
    }

    /// Children of a node in discovery order (empty for unknown ids)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.entries
            .get(id.0)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn depth_of(&self, id: NodeId) -> Option<usize> {
        self.node(id).map(UrlNode::depth)
    }

    pub fn host_name(&self, id: NodeId) -> Option<String> {
        self.node(id).and_then(UrlNode::host_name)
    }

    /// Looks up the node holding a normalized URL
    pub fn get(&self, url: &Url) -> Option<NodeId> {
        self.index.get(url.as_str()).copied()
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.index.contains_key(url.as_str())
    }

    /// Walks the tree breadth-first from the root
    pub fn iter(&self) -> BreadthFirst<'_> {
        BreadthFirst {
            map: self,
            queue: VecDeque::from([self.root()]),
        }
    }

    /// Builds the nested, serializable view of the tree
    pub fn to_tree(&self) -> SiteTree {
        SiteTree::build(self, self.root())
    }
}

/// Breadth-first iterator over a [`SiteMap`]
pub struct BreadthFirst<'a> {
    map: &'a SiteMap,
    queue: VecDeque<NodeId>,
}

impl<'a> Iterator for BreadthFirst<'a> {
    type Item = (NodeId, &'a UrlNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.queue.pop_front()?;
        let entry = &self.map.entries[id.0];
        self.queue.extend(entry.children.iter().copied());
        Some((id, &entry.node))
    }
}

impl<'a> IntoIterator for &'a SiteMap {
    type Item = (NodeId, &'a UrlNode);
    type IntoIter = BreadthFirst<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn create_test_map(max_depth: usize) -> SiteMap {
        SiteMap::new(url("https://example.com/"), max_depth)
    }

    fn add(map: &mut SiteMap, parent: NodeId, s: &str) -> Result<NodeId, SiteMapError> {
        let candidate = map.node(parent).unwrap().child(url(s));
        map.add_child(parent, candidate)
    }

    #[test]
    fn test_new_map_has_root_only() {
        let map = create_test_map(2);
        assert_eq!(map.node_count(), 1);
        assert_eq!(map.depth_of(map.root()), Some(0));
        assert_eq!(map.parent(map.root()), None);
        assert!(map.children(map.root()).is_empty());
        assert_eq!(map.host_name(map.root()), Some("example.com".to_string()));
    }

    #[test]
    fn test_add_child() {
        let mut map = create_test_map(2);
        let root = map.root();
        let id = add(&mut map, root, "https://example.com/about").unwrap();

        assert_eq!(map.node_count(), 2);
        assert_eq!(map.parent(id), Some(root));
        assert_eq!(map.children(root), &[id]);
        assert_eq!(map.depth_of(id), Some(1));
        assert!(map.contains(&url("https://example.com/about")));
        assert_eq!(map.get(&url("https://example.com/about")), Some(id));
    }

    #[test]
    fn test_max_depth_zero_allows_root_only() {
        let mut map = create_test_map(0);
        let root = map.root();
        let err = add(&mut map, root, "https://example.com/a").unwrap_err();
        assert_eq!(
            err,
            SiteMapError::InvalidNode(InvalidNode::DepthExceeded {
                depth: 1,
                max_depth: 0
            })
        );
        assert!(err.is_invalid_node());
        assert_eq!(map.node_count(), 1);
    }

    #[test]
    fn test_depth_boundary_is_inclusive() {
        let mut map = create_test_map(1);
        let root = map.root();
        let child = add(&mut map, root, "https://example.com/a").unwrap();
        let err = add(&mut map, child, "https://example.com/a/b").unwrap_err();
        assert!(matches!(
            err,
            SiteMapError::InvalidNode(InvalidNode::DepthExceeded { depth: 2, .. })
        ));
    }

    #[test]
    fn test_duplicate_rejected_anywhere_in_tree() {
        let mut map = create_test_map(3);
        let root = map.root();
        let a = add(&mut map, root, "https://example.com/a").unwrap();
        let b = add(&mut map, root, "https://example.com/b").unwrap();
        let shared = add(&mut map, a, "https://example.com/shared").unwrap();

        let err = add(&mut map, b, "https://example.com/shared").unwrap_err();
        assert!(matches!(err, SiteMapError::InvalidNode(InvalidNode::Duplicate(_))));
        assert_eq!(map.parent(shared), Some(a));
        assert!(map.children(b).is_empty());
    }

    #[test]
    fn test_link_back_to_root_rejected() {
        let mut map = create_test_map(3);
        let root = map.root();
        let a = add(&mut map, root, "https://example.com/a").unwrap();
        let err = add(&mut map, a, "https://example.com/").unwrap_err();
        assert!(err.is_invalid_node());
    }

    #[test]
    fn test_unknown_parent() {
        let mut map = create_test_map(3);
        let mut other = create_test_map(3);
        let root = other.root();
        let foreign = add(&mut other, root, "https://example.com/x").unwrap();

        let candidate = UrlNode::new(url("https://example.com/y"), 2);
        let err = map.add_child(foreign, candidate).unwrap_err();
        assert_eq!(err, SiteMapError::UnknownParent(foreign));
        assert!(!err.is_invalid_node());
    }

    #[test]
    fn test_depth_mismatch() {
        let mut map = create_test_map(3);
        let candidate = UrlNode::new(url("https://example.com/deep"), 2);
        let err = map.add_child(map.root(), candidate).unwrap_err();
        assert_eq!(
            err,
            SiteMapError::DepthMismatch {
                parent: 0,
                candidate: 2
            }
        );
    }

    #[test]
    fn test_breadth_first_iteration() {
        let mut map = create_test_map(3);
        let root = map.root();
        let a = add(&mut map, root, "https://example.com/a").unwrap();
        add(&mut map, a, "https://example.com/a/1").unwrap();
        add(&mut map, root, "https://example.com/b").unwrap();

        let urls: Vec<&str> = map.iter().map(|(_, node)| node.key()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/",
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/a/1",
            ]
        );

        let depths: Vec<usize> = (&map).into_iter().map(|(_, n)| n.depth()).collect();
        assert_eq!(depths, vec![0, 1, 1, 2]);
    }
}
