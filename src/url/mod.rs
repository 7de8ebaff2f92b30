//! URL handling module for Site-Mapper
//!
//! This module turns raw link strings into the absolute, normalized addresses
//! used as site map node identities, and extracts hostnames for rate limiting.

mod domain;
mod resolve;

// Re-export main functions
pub use domain::extract_host;
pub use resolve::{normalize_url, resolve_url};
