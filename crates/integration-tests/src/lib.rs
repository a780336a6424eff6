//! Integration tests for QuickCart.
//!
//! These tests wire real components together (stores, cache, limiter,
//! prefetcher) against in-process stub backends; nothing here talks to
//! a live server. Run with `cargo test -p quickcart-integration-tests`.
//!
//! The crate root holds the shared fixtures: stub implementations of
//! the [`ProductSource`] and [`WishlistApi`] seams plus product/entry
//! builders used across the `tests/` files.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use secrecy::SecretString;

use quickcart_client::api::{ApiError, ProductSource, WishlistApi};
use quickcart_core::{
    Price, Product, ProductId, ProductPage, ProductQuery, UserId, WishlistItem, WishlistItemId,
    WishlistProduct,
};

/// A throwaway directory for file-persistence tests.
///
/// Removed on drop; a leaked directory from a crashed test run has a
/// recognizable `quickcart-it-` prefix under the system temp dir.
pub struct TempStorageDir {
    path: PathBuf,
}

impl TempStorageDir {
    #[must_use]
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("quickcart-it-{}", uuid::Uuid::new_v4()));
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Default for TempStorageDir {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempStorageDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Build a catalog product with the given pricing and stock.
#[must_use]
pub fn product(id: &str, price: i64, sale: Option<i64>, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        description: String::new(),
        price: Price::from_major(price),
        sale_price: sale.map(Price::from_major),
        image: None,
        stock,
        category: None,
        rating: None,
        review_count: 0,
    }
}

/// Build a wishlist entry for a user/product pair.
#[must_use]
pub fn wishlist_entry(user: &str, product: &Product) -> WishlistItem {
    WishlistItem {
        id: WishlistItemId::new(format!("wl-{}", product.id)),
        user_id: UserId::new(user),
        product: WishlistProduct {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            sale_price: product.sale_price,
            image: product.image.clone(),
            stock: product.stock,
        },
        created_at: Utc::now(),
    }
}

// =============================================================================
// Stub backends
// =============================================================================

/// In-process catalog backend: serves a fixed product list, one page
/// per query, and counts every call.
#[derive(Clone, Default)]
pub struct StubCatalog {
    pub calls: Arc<AtomicUsize>,
    pub products: Vec<Product>,
}

impl StubCatalog {
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            products,
        }
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProductSource for StubCatalog {
    async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ProductPage {
            products: self.products.clone(),
            page: query.page,
            total_pages: 5,
            total_count: self.products.len() as u64 * 5,
        })
    }
}

/// In-process wishlist backend: accepts every mutation and counts calls.
#[derive(Clone, Default)]
pub struct StubWishlistBackend {
    pub calls: Arc<AtomicUsize>,
    pub initial: Vec<WishlistItem>,
}

impl StubWishlistBackend {
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl WishlistApi for StubWishlistBackend {
    async fn fetch_wishlist(&self, _token: &SecretString) -> Result<Vec<WishlistItem>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.initial.clone())
    }

    async fn add_wishlist_item(
        &self,
        _token: &SecretString,
        product_id: &ProductId,
    ) -> Result<WishlistItem, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(wishlist_entry(
            "u-1",
            &product(product_id.as_str(), 1000, None, 5),
        ))
    }

    async fn remove_wishlist_item(
        &self,
        _token: &SecretString,
        _product_id: &ProductId,
    ) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear_wishlist(&self, _token: &SecretString) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn move_wishlist_item_to_cart(
        &self,
        _token: &SecretString,
        _product_id: &ProductId,
        _quantity: u32,
    ) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
