//! Policy-driven cache warming.
//!
//! Prefetching is speculative: it goes through the same cache and
//! limiter as real traffic, its failures are swallowed, and it never
//! evicts a page the user is looking at. The policy decides how far
//! ahead of the user to run.

use quickcart_core::{Category, ProductQuery};

use crate::api::ProductSource;
use crate::config::PrefetchPolicy;
use crate::fetch::cache::QueryCache;

/// Warms the [`QueryCache`] according to a [`PrefetchPolicy`].
///
/// Cheap to clone; shares the cache with the rest of the client.
pub struct Prefetcher<S: ProductSource> {
    cache: QueryCache<S>,
    policy: PrefetchPolicy,
}

impl<S: ProductSource> Clone for Prefetcher<S> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            policy: self.policy,
        }
    }
}

impl<S: ProductSource> Prefetcher<S> {
    /// Create a prefetcher over a cache.
    #[must_use]
    pub const fn new(cache: QueryCache<S>, policy: PrefetchPolicy) -> Self {
        Self { cache, policy }
    }

    /// Warm the first page of the default listing (app start).
    ///
    /// Runs under every policy except [`PrefetchPolicy::Disabled`].
    pub fn warm_default_listing(&self, page_size: u32) {
        if self.policy == PrefetchPolicy::Disabled {
            return;
        }
        self.dispatch(ProductQuery::first_page(page_size));
    }

    /// Warm the pages adjacent to a listing the user is viewing.
    ///
    /// Aggressive policy only: the next page always, the previous page
    /// when one exists.
    pub fn around_listing(&self, query: &ProductQuery) {
        if self.policy != PrefetchPolicy::Aggressive {
            return;
        }
        self.dispatch(query.next_page());
        if let Some(prev) = query.prev_page() {
            self.dispatch(prev);
        }
    }

    /// Warm the first page of each category listing (category nav).
    ///
    /// Aggressive policy only.
    pub fn warm_categories<'a>(
        &self,
        categories: impl IntoIterator<Item = &'a Category>,
        page_size: u32,
    ) {
        if self.policy != PrefetchPolicy::Aggressive {
            return;
        }
        for category in categories {
            self.dispatch(ProductQuery::first_page(page_size).with_category(category.id.clone()));
        }
    }

    /// Warm the first page of a search the user is likely to submit
    /// (fired as they type, debounced by the caller).
    ///
    /// Aggressive policy only.
    pub fn warm_search(&self, term: &str, page_size: u32) {
        if self.policy != PrefetchPolicy::Aggressive || term.is_empty() {
            return;
        }
        self.dispatch(ProductQuery::first_page(page_size).with_search(term));
    }

    /// Spawn a warm for one query; failures stay inside the task.
    fn dispatch(&self, query: ProductQuery) {
        let cache = self.cache.clone();
        tokio::spawn(async move {
            cache.warm(&query).await;
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use quickcart_core::{CategoryId, Price, Product, ProductId, ProductPage};

    use crate::api::ApiError;
    use crate::config::CacheConfig;
    use crate::fetch::limiter::RequestLimiter;

    #[derive(Clone, Default)]
    struct StubSource {
        calls: Arc<AtomicUsize>,
    }

    impl ProductSource for StubSource {
        async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ProductPage {
                products: vec![Product {
                    id: ProductId::new("p1"),
                    name: "Widget".to_string(),
                    description: String::new(),
                    price: Price::from_major(1000),
                    sale_price: None,
                    image: None,
                    stock: 5,
                    category: None,
                    rating: None,
                    review_count: 0,
                }],
                page: query.page,
                total_pages: 10,
                total_count: 120,
            })
        }
    }

    fn prefetcher(policy: PrefetchPolicy) -> (Prefetcher<StubSource>, Arc<AtomicUsize>) {
        let source = StubSource::default();
        let calls = Arc::clone(&source.calls);
        let cache = QueryCache::new(
            source,
            RequestLimiter::with_limits(3, Duration::ZERO),
            CacheConfig {
                stale_time: Duration::from_secs(60),
                gc_time: Duration::from_secs(30 * 60),
                retry_limit: 0,
                prefetch: policy,
            },
        );
        (Prefetcher::new(cache, policy), calls)
    }

    async fn settle(calls: &AtomicUsize, expected: usize) {
        for _ in 0..1000 {
            if calls.load(Ordering::SeqCst) >= expected {
                break;
            }
            tokio::task::yield_now().await;
        }
        // A few extra yields catch any over-eager dispatches.
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_disabled_policy_never_fetches() {
        let (prefetcher, calls) = prefetcher(PrefetchPolicy::Disabled);
        prefetcher.warm_default_listing(12);
        prefetcher.around_listing(&ProductQuery::first_page(12));
        settle(&calls, 0).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_essential_policy_warms_default_listing_only() {
        let (prefetcher, calls) = prefetcher(PrefetchPolicy::Essential);
        prefetcher.warm_default_listing(12);
        prefetcher.around_listing(&ProductQuery::first_page(12).with_page(3));
        settle(&calls, 1).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_aggressive_policy_warms_adjacent_pages() {
        let (prefetcher, calls) = prefetcher(PrefetchPolicy::Aggressive);
        prefetcher.around_listing(&ProductQuery::first_page(12).with_page(3));
        settle(&calls, 2).await;
        // Pages 2 and 4.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_aggressive_first_page_has_no_previous() {
        let (prefetcher, calls) = prefetcher(PrefetchPolicy::Aggressive);
        prefetcher.around_listing(&ProductQuery::first_page(12));
        settle(&calls, 1).await;
        // Only page 2; there is no page 0.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_search_warming_is_aggressive_only() {
        let (aggressive, calls) = prefetcher(PrefetchPolicy::Aggressive);
        aggressive.warm_search("lamp", 12);
        aggressive.warm_search("", 12); // nothing to search yet
        settle(&calls, 1).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let (essential, calls) = prefetcher(PrefetchPolicy::Essential);
        essential.warm_search("lamp", 12);
        settle(&calls, 0).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_aggressive_warms_category_listings() {
        let (prefetcher, calls) = prefetcher(PrefetchPolicy::Aggressive);
        let categories = vec![
            Category {
                id: CategoryId::new("cat-1"),
                name: "Lamps".to_string(),
                product_count: 4,
            },
            Category {
                id: CategoryId::new("cat-2"),
                name: "Desks".to_string(),
                product_count: 9,
            },
        ];
        prefetcher.warm_categories(&categories, 12);
        settle(&calls, 2).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
