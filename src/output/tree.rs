use crate::site::{NodeId, SiteMap};

/// Renders a site map as an indented text tree
///
/// ```text
/// https://example.com/
///   https://example.com/about
///     https://example.com/about/team
///   https://example.com/blog
/// ```
pub fn render_tree(site_map: &SiteMap) -> String {
    let mut out = String::new();
    let mut stack: Vec<NodeId> = vec![site_map.root()];

    // Depth-first with children pushed in reverse to keep discovery order
    while let Some(id) = stack.pop() {
        if let Some(node) = site_map.node(id) {
            out.push_str(&"  ".repeat(node.depth()));
            out.push_str(node.key());
            out.push('\n');
        }
        stack.extend(site_map.children(id).iter().rev().copied());
    }

    out
}
