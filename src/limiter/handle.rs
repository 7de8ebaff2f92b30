use crate::FetchError;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared throttle for one hostname
///
/// Permits are handed out at least `1s / rate_limit` apart, with no burst.
/// A rate limit of 0 disables throttling.
#[derive(Debug, Clone)]
pub struct LimiterHandle {
    inner: Arc<LimiterState>,
}

struct LimiterState {
    hostname: String,
    interval: Duration,

    /// None when unthrottled
    limiter: Option<DefaultDirectRateLimiter>,

    stopped: AtomicBool,
}

impl fmt::Debug for LimiterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LimiterState")
            .field("hostname", &self.hostname)
            .field("interval", &self.interval)
            .field("stopped", &self.stopped)
            .finish()
    }
}

impl LimiterHandle {
    pub(crate) fn new(hostname: &str, rate_limit: u32) -> Self {
        let interval = interval_for(rate_limit);

        // One permit per interval, burst of one
        let limiter = Quota::with_period(interval).map(RateLimiter::direct);

        Self {
            inner: Arc::new(LimiterState {
                hostname: hostname.to_string(),
                interval,
                limiter,
                stopped: AtomicBool::new(false),
            }),
        }
    }

    /// Waits until a request to this host is allowed
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The caller may send one request now
    /// * `Err(FetchError::LimiterStopped)` - The limiter was released
    pub async fn acquire(&self) -> Result<(), FetchError> {
        self.ensure_running()?;

        if let Some(limiter) = &self.inner.limiter {
            if limiter.check().is_err() {
                tracing::trace!("Waiting for {} permit", self.inner.hostname);
                limiter.until_ready().await;
            }
        }

        // Stopped while we were waiting
        self.ensure_running()
    }

    pub fn hostname(&self) -> &str {
        &self.inner.hostname
    }

    /// Minimum spacing between two permits
    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::Acquire)
    }

    /// Returns true if both handles throttle through the same limiter
    pub fn same_limiter(&self, other: &LimiterHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn stop(&self) {
        self.inner.stopped.store(true, Ordering::Release);
    }

    fn ensure_running(&self) -> Result<(), FetchError> {
        if self.is_stopped() {
            return Err(FetchError::LimiterStopped {
                hostname: self.inner.hostname.clone(),
            });
        }
        Ok(())
    }
}

fn interval_for(rate_limit: u32) -> Duration {
    if rate_limit == 0 {
        Duration::ZERO
    } else {
        Duration::from_secs(1) / rate_limit
    }
}
