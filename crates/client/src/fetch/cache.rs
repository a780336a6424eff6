//! Query-keyed product page cache with stale-while-revalidate reads.
//!
//! Every cached page carries its fetch time. A read inside the
//! staleness window is served with no network call; a stale read is
//! served from cache immediately while a single background revalidation
//! is dispatched for that key. Entries older than the GC window are
//! evicted by the underlying cache.
//!
//! Misses fetch through the [`RequestLimiter`] with exponential backoff
//! between retries. Background revalidation failures are swallowed (the
//! stale page stays served); foreground failures propagate.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use quickcart_core::{ProductPage, ProductQuery};

use crate::api::{ApiError, ProductSource};
use crate::config::CacheConfig;
use crate::fetch::limiter::RequestLimiter;

/// Backoff ceiling between fetch retries.
const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(30);

/// A cached listing page and when it was fetched.
#[derive(Clone)]
struct CachedPage {
    page: Arc<ProductPage>,
    fetched_at: Instant,
}

/// Stale-while-revalidate cache over a [`ProductSource`].
///
/// Cheap to clone; all clones share entries, limiter, and in-flight
/// revalidation bookkeeping.
pub struct QueryCache<S: ProductSource> {
    inner: Arc<CacheInner<S>>,
}

impl<S: ProductSource> Clone for QueryCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CacheInner<S> {
    source: S,
    limiter: RequestLimiter,
    config: CacheConfig,
    entries: moka::future::Cache<ProductQuery, CachedPage>,
    /// Keys with a background revalidation already in flight.
    revalidating: Mutex<HashSet<ProductQuery>>,
}

impl<S: ProductSource> QueryCache<S> {
    /// Create a cache over a product source.
    #[must_use]
    pub fn new(source: S, limiter: RequestLimiter, config: CacheConfig) -> Self {
        let entries = moka::future::Cache::builder()
            .time_to_live(config.gc_time)
            .build();
        Self {
            inner: Arc::new(CacheInner {
                source,
                limiter,
                config,
                entries,
                revalidating: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Fetch one page of products, serving from cache when possible.
    ///
    /// Fresh hit: cached page, no network. Stale hit: cached page now,
    /// one background revalidation dispatched. Miss: foreground fetch
    /// through the limiter with retries.
    ///
    /// # Errors
    ///
    /// Returns the fetch failure on a cache miss once retries are
    /// exhausted. Cached reads never fail.
    pub async fn fetch_products(&self, query: &ProductQuery) -> Result<Arc<ProductPage>, ApiError> {
        if let Some(entry) = self.inner.entries.get(query).await {
            if entry.fetched_at.elapsed() > self.inner.config.stale_time {
                self.spawn_revalidation(query);
            }
            return Ok(entry.page);
        }
        self.fetch_and_store(query).await
    }

    /// Warm the cache for a query unless a usably fresh page exists.
    ///
    /// Failures are logged at `debug` and swallowed; prefetching must
    /// never surface errors or evict a served page.
    pub async fn warm(&self, query: &ProductQuery) {
        if let Some(entry) = self.inner.entries.get(query).await
            && entry.fetched_at.elapsed() <= self.inner.config.stale_time
        {
            return;
        }
        if let Err(e) = self.fetch_and_store(query).await {
            tracing::debug!(error = %e, page = query.page, "Prefetch failed");
        }
    }

    /// Drop the cached page for one query.
    pub async fn invalidate(&self, query: &ProductQuery) {
        self.inner.entries.invalidate(query).await;
    }

    /// Drop every cached page.
    pub fn invalidate_all(&self) {
        self.inner.entries.invalidate_all();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Dispatch a background refetch for a stale key, at most one per
    /// key at a time.
    fn spawn_revalidation(&self, query: &ProductQuery) {
        {
            let mut in_flight = self
                .inner
                .revalidating
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if !in_flight.insert(query.clone()) {
                return;
            }
        }

        let cache = self.clone();
        let query = query.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.fetch_and_store(&query).await {
                tracing::debug!(error = %e, page = query.page, "Revalidation failed, serving stale");
            }
            cache
                .inner
                .revalidating
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&query);
        });
    }

    /// Foreground fetch with retries; stores the page on success.
    async fn fetch_and_store(&self, query: &ProductQuery) -> Result<Arc<ProductPage>, ApiError> {
        let page = Arc::new(self.fetch_with_retry(query).await?);
        self.inner
            .entries
            .insert(
                query.clone(),
                CachedPage {
                    page: Arc::clone(&page),
                    fetched_at: Instant::now(),
                },
            )
            .await;
        Ok(page)
    }

    /// One fetch through the limiter, retried with exponential backoff.
    async fn fetch_with_retry(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let mut attempt: u32 = 0;
        loop {
            let result = {
                let _permit = self.inner.limiter.acquire().await;
                self.inner.source.list_products(query).await
            };
            match result {
                Ok(page) => return Ok(page),
                Err(e) if attempt < self.inner.config.retry_limit => {
                    let delay = retry_backoff(attempt);
                    tracing::debug!(
                        error = %e,
                        attempt,
                        delay = ?delay,
                        "Product fetch failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// 1s doubling per attempt, capped at [`MAX_RETRY_BACKOFF`].
fn retry_backoff(attempt: u32) -> Duration {
    let millis = 1000u64.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(millis).min(MAX_RETRY_BACKOFF)
}
