//! Site map module
//!
//! This module provides the depth-bounded tree produced by a crawl.
//!
//! # Components
//!
//! - `UrlNode`: A normalized URL plus its depth from the root
//! - `SiteMap`: Arena-backed tree of nodes with whole-tree duplicate suppression
//! - `SiteTree`: Nested, serializable view of a finished site map

mod export;
mod map;
mod node;

// Re-export main types
pub use export::SiteTree;
pub use map::{BreadthFirst, NodeId, SiteMap};
pub use node::UrlNode;
