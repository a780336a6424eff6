//! The device-local cart store.
//!
//! Wraps the [`Cart`] aggregate with session-wide sharing and a durable
//! snapshot. The cart belongs to the browsing session (device-local),
//! independent of authentication; multiple browser contexts racing on
//! the same durable storage resolve last-write-wins.
//!
//! Mutations are synchronous and atomic with respect to readers: the
//! aggregate is updated under a write lock and the snapshot write
//! happens after the lock is released (best-effort, fire-and-forget
//! durability).

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use quickcart_core::{Cart, CartItem, Price, Product, ProductId};

use super::persist::{CART_KEY, StorageBackend};

/// Shared handle to the session's shopping cart.
///
/// Cheap to clone; all clones see the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    storage: Arc<dyn StorageBackend>,
    cart: RwLock<Cart>,
}

impl CartStore {
    /// Create a cart store, restoring the persisted snapshot.
    ///
    /// A malformed snapshot is discarded and wiped from storage; the
    /// store starts empty and the caller never sees an error.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        let cart = match storage.load(CART_KEY) {
            Some(raw) => match serde_json::from_str::<Vec<CartItem>>(&raw) {
                Ok(items) => Cart::from_items(items),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding corrupt cart snapshot");
                    storage.remove(CART_KEY);
                    Cart::new()
                }
            },
            None => Cart::new(),
        };

        Self {
            inner: Arc::new(CartStoreInner {
                storage,
                cart: RwLock::new(cart),
            }),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of a product.
    ///
    /// An existing line item has its quantity incremented (clamped to
    /// stock); otherwise a new line is appended with the product's
    /// current price/image snapshot. Persists the cart.
    pub fn add_to_cart(&self, product: &Product) {
        let snapshot = {
            let mut cart = self.write();
            cart.add(product);
            cart.clone()
        };
        self.persist(&snapshot);
    }

    /// Remove a line item. Idempotent. Persists the cart.
    pub fn remove_from_cart(&self, product_id: &ProductId) {
        let snapshot = {
            let mut cart = self.write();
            cart.remove(product_id);
            cart.clone()
        };
        self.persist(&snapshot);
    }

    /// Set a line item's quantity.
    ///
    /// Quantity 0 behaves exactly like [`CartStore::remove_from_cart`];
    /// otherwise the quantity is clamped to stock. Persists the cart.
    pub fn update_quantity(&self, product_id: &ProductId, quantity: u32) {
        let snapshot = {
            let mut cart = self.write();
            cart.set_quantity(product_id, quantity);
            cart.clone()
        };
        self.persist(&snapshot);
    }

    /// Empty the cart in memory only.
    ///
    /// The durable snapshot is left untouched until the next save cycle,
    /// unlike [`CartStore::reset_cart`].
    pub fn clear_cart(&self) {
        self.write().clear();
    }

    /// Empty the cart AND erase the durable snapshot immediately.
    pub fn reset_cart(&self) {
        self.write().clear();
        self.inner.storage.remove(CART_KEY);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether a product has a line item.
    #[must_use]
    pub fn is_in_cart(&self, product_id: &ProductId) -> bool {
        self.read().contains(product_id)
    }

    /// Quantity of a product in the cart, 0 when absent.
    #[must_use]
    pub fn item_quantity(&self, product_id: &ProductId) -> u32 {
        self.read().quantity_of(product_id)
    }

    /// Sum of quantities over all line items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.read().item_count()
    }

    /// Sum of effective price x quantity over all line items.
    #[must_use]
    pub fn total_amount(&self) -> Price {
        self.read().total_amount()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// A cloned snapshot of the line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.read().items().to_vec()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn read(&self) -> RwLockReadGuard<'_, Cart> {
        self.inner.cart.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Cart> {
        self.inner.cart.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write the full snapshot to durable storage (best-effort).
    fn persist(&self, cart: &Cart) {
        match serde_json::to_string(cart.items()) {
            Ok(json) => self.inner.storage.save(CART_KEY, &json),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize cart snapshot"),
        }
    }
}
