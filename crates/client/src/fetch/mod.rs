//! Stale-while-revalidate fetch layer for product listings.
//!
//! - [`limiter`] - global in-flight cap with minimum request spacing
//! - [`cache`] - query-keyed page cache with background revalidation
//! - [`prefetch`] - policy-driven cache warming
//!
//! All catalog traffic funnels through [`QueryCache`], so the limiter
//! bounds the whole client's pressure on the backend, prefetch
//! included.

pub mod cache;
pub mod limiter;
pub mod prefetch;

pub use cache::QueryCache;
pub use limiter::RequestLimiter;
pub use prefetch::Prefetcher;
