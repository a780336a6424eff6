//! Global request limiter: a bounded number of in-flight catalog
//! requests plus a minimum gap between dispatches.
//!
//! The backend rate-limits per client IP; keeping concurrency low and
//! dispatches spaced out avoids tripping it in the first place rather
//! than reacting to 429s after the fact. Waiters are served in FIFO
//! order so a burst of prefetches cannot starve a user-initiated fetch
//! indefinitely.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

/// Maximum catalog requests in flight at once.
pub const MAX_IN_FLIGHT: usize = 3;

/// Minimum gap between consecutive request dispatches.
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(100);

/// Shared limiter over all catalog traffic.
///
/// Cheap to clone; all clones share the same slots and spacing clock.
#[derive(Clone)]
pub struct RequestLimiter {
    inner: Arc<LimiterInner>,
}

struct LimiterInner {
    slots: Arc<Semaphore>,
    min_interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

/// Holds an in-flight slot; dropped when the request completes.
pub struct RequestPermit {
    _permit: Option<OwnedSemaphorePermit>,
}

impl RequestLimiter {
    /// Create a limiter with the standard slot count and spacing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(MAX_IN_FLIGHT, MIN_REQUEST_INTERVAL)
    }

    /// Create a limiter with explicit limits (tests use tighter ones).
    #[must_use]
    pub fn with_limits(max_in_flight: usize, min_interval: Duration) -> Self {
        Self {
            inner: Arc::new(LimiterInner {
                slots: Arc::new(Semaphore::new(max_in_flight)),
                min_interval,
                last_dispatch: Mutex::new(None),
            }),
        }
    }

    /// Wait for an in-flight slot, then for the spacing gap.
    ///
    /// The returned permit must be held for the duration of the request.
    /// Slot waiters queue FIFO; the spacing gap is enforced after the
    /// slot is granted so a full pipeline does not also pay the gap.
    pub async fn acquire(&self) -> RequestPermit {
        let permit = match Arc::clone(&self.inner.slots).acquire_owned().await {
            Ok(permit) => Some(permit),
            // The semaphore is never closed.
            Err(_) => None,
        };

        let mut last = self.inner.last_dispatch.lock().await;
        if let Some(previous) = *last {
            let next_slot = previous + self.inner.min_interval;
            let now = Instant::now();
            if next_slot > now {
                tokio::time::sleep_until(next_slot).await;
            }
        }
        *last = Some(Instant::now());
        drop(last);

        RequestPermit { _permit: permit }
    }
}

impl Default for RequestLimiter {
    fn default() -> Self {
        Self::new()
    }
}
