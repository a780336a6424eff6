//! QuickCart Client - the storefront's instant-loading core.
//!
//! This crate provides the client-side engine behind the storefront UI:
//!
//! - [`store::CartStore`] - device-local shopping cart with a durable
//!   snapshot (the cart belongs to the browsing session, not to an
//!   account)
//! - [`store::WishlistStore`] - per-user wishlist synchronized with the
//!   backend, with optimistic local updates
//! - [`fetch::QueryCache`] - stale-while-revalidate cache for paginated
//!   product listings, with a process-wide request limiter and
//!   speculative prefetch
//! - [`api::ApiClient`] - REST client for the backend (products,
//!   wishlist, orders, payments, reviews)
//!
//! # Architecture
//!
//! UI components read from the stores/cache and dispatch mutations.
//! Cart mutations are synchronous and immediately visible; network and
//! persistence work is either awaited explicitly by the caller (wishlist
//! mutations, primary fetches) or fire-and-forget (prefetch, background
//! revalidation, snapshot writes).
//!
//! Environment-conditional behavior (staleness windows, retry counts,
//! prefetch aggressiveness) is carried by an explicit
//! [`config::CacheConfig`] injected at construction, never by inline
//! branching on a runtime flag.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod store;

pub use api::ApiClient;
pub use config::{CacheConfig, ClientConfig, Environment, PrefetchPolicy};
pub use error::{ClientError, Result};
pub use fetch::{Prefetcher, QueryCache, RequestLimiter};
pub use store::{AuthSession, CartStore, WishlistStore};
