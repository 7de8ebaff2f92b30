//! Per-hostname rate limiting
//!
//! A crawl takes a lease on its root host's limiter from a
//! [`RateLimiterRegistry`] and every fetch waits on [`LimiterHandle::acquire`]
//! before touching the network. Handles are shared, so separate crawls of the
//! same host draw from one throttle while they overlap.

mod handle;
mod registry;

pub use handle::LimiterHandle;
pub use registry::{LimiterLease, RateLimiterRegistry};
