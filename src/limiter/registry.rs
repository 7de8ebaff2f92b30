use crate::limiter::LimiterHandle;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Registry of per-hostname rate limiters
///
/// Each hostname maps to one shared [`LimiterHandle`] plus a count of live
/// leases. [`get`](Self::get) takes a lease, [`stop`](Self::stop) returns one;
/// the handle is stopped and forgotten when its last lease is returned.
#[derive(Debug, Default)]
pub struct RateLimiterRegistry {
    limiters: Mutex<HashMap<String, Registered>>,
}

#[derive(Debug)]
struct Registered {
    handle: LimiterHandle,
    leases: usize,
}

impl RateLimiterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry shared by every crawl
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<RateLimiterRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(Self::new())).clone()
    }

    /// Gets the limiter for a hostname, creating it on first use
    ///
    /// While the hostname is registered, later calls reuse the existing handle
    /// and the rate it was first registered with.
    pub fn get(&self, hostname: &str, rate_limit: u32) -> LimiterHandle {
        let mut limiters = self.lock();
        let registered = limiters
            .entry(hostname.to_string())
            .or_insert_with(|| {
                tracing::debug!("Creating rate limiter for {} ({} req/s)", hostname, rate_limit);
                Registered {
                    handle: LimiterHandle::new(hostname, rate_limit),
                    leases: 0,
                }
            });

        registered.leases += 1;
        registered.handle.clone()
    }

    /// Releases one lease on a hostname's limiter
    pub fn stop(&self, hostname: &str) {
        let mut limiters = self.lock();

        let Some(registered) = limiters.get_mut(hostname) else {
            tracing::warn!("Stopping rate limiter for unknown host {}", hostname);
            return;
        };

        registered.leases = registered.leases.saturating_sub(1);
        if registered.leases == 0 {
            registered.handle.stop();
            limiters.remove(hostname);
            tracing::debug!("Stopped rate limiter for {}", hostname);
        }
    }

    /// Takes a lease that is returned when the guard is dropped
    pub fn lease(&self, hostname: &str, rate_limit: u32) -> LimiterLease<'_> {
        let handle = self.get(hostname, rate_limit);
        LimiterLease {
            registry: self,
            hostname: hostname.to_string(),
            handle,
        }
    }

    pub fn is_registered(&self, hostname: &str) -> bool {
        self.lock().contains_key(hostname)
    }

    /// Number of live leases on a hostname's limiter
    pub fn lease_count(&self, hostname: &str) -> usize {
        self.lock().get(hostname).map_or(0, |r| r.leases)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Registered>> {
        self.limiters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Scoped lease on a hostname's limiter
///
/// Dropping the lease calls [`RateLimiterRegistry::stop`] for its hostname.
pub struct LimiterLease<'a> {
    registry: &'a RateLimiterRegistry,
    hostname: String,
    handle: LimiterHandle,
}

impl LimiterLease<'_> {
    pub fn handle(&self) -> &LimiterHandle {
        &self.handle
    }
}

impl Drop for LimiterLease<'_> {
    fn drop(&mut self) {
        self.registry.stop(&self.hostname);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_get_creates_and_reuses() {
        let registry = RateLimiterRegistry::new();
        let a = registry.get("example.com", 5);
        let b = registry.get("example.com", 50);

        assert!(a.same_limiter(&b));
        // First registration decides the rate
        assert_eq!(b.interval(), Duration::from_millis(200));
        assert_eq!(registry.lease_count("example.com"), 2);
    }

    #[test]
    fn test_hosts_are_independent() {
        let registry = RateLimiterRegistry::new();
        let a = registry.get("a.com", 5);
        let b = registry.get("b.com", 5);
        assert!(!a.same_limiter(&b));
    }

    #[test]
    fn test_stop_waits_for_last_lease() {
        let registry = RateLimiterRegistry::new();
        let handle = registry.get("example.com", 5);
        registry.get("example.com", 5);

        registry.stop("example.com");
        assert!(!handle.is_stopped());
        assert!(registry.is_registered("example.com"));

        registry.stop("example.com");
        assert!(handle.is_stopped());
        assert!(!registry.is_registered("example.com"));
    }

    #[test]
    fn test_stop_unknown_host_is_harmless() {
        let registry = RateLimiterRegistry::new();
        registry.stop("nowhere.com");
        assert_eq!(registry.lease_count("nowhere.com"), 0);
    }

    #[test]
    fn test_lease_released_on_drop() {
        let registry = RateLimiterRegistry::new();
        let handle = {
            let lease = registry.lease("example.com", 5);
            assert_eq!(registry.lease_count("example.com"), 1);
            lease.handle().clone()
        };

        assert!(handle.is_stopped());
        assert!(!registry.is_registered("example.com"));
    }

    #[test]
    fn test_new_limiter_after_release() {
        let registry = RateLimiterRegistry::new();
        let first = registry.lease("example.com", 5).handle().clone();
        let second = registry.get("example.com", 5);

        assert!(!first.same_limiter(&second));
        assert!(!second.is_stopped());
    }

    #[test]
    fn test_global_is_shared() {
        let a = RateLimiterRegistry::global();
        let b = RateLimiterRegistry::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
