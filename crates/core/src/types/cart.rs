//! The cart aggregate and its line items.
//!
//! Cart math lives here, free of I/O, so the invariants are testable in
//! isolation. The two rules every mutation preserves:
//!
//! 1. `quantity <= stock` for every line item - violations are clamped
//!    down, never rejected.
//! 2. Line items are unique by product id; adding an existing product
//!    increments its quantity.
//!
//! Prices are snapshotted from the product at add time. Later catalog
//! price changes never retroactively change a cart line.

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::price::Price;
use crate::types::product::Product;

/// A line item in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier (unique within the cart).
    pub id: ProductId,
    /// Product name (denormalized for display).
    pub name: String,
    /// Base price at add time.
    pub price: Price,
    /// Sale price at add time, if any.
    #[serde(default)]
    pub sale_price: Option<Price>,
    /// Primary image URL at add time.
    #[serde(default)]
    pub image: Option<String>,
    /// Quantity in the cart (always >= 1).
    pub quantity: u32,
    /// Stock ceiling at add time.
    pub stock: u32,
}

impl CartItem {
    /// Snapshot a product into a line item with quantity 1.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            sale_price: product.sale_price,
            image: product.image.clone(),
            quantity: 1,
            stock: product.stock,
        }
    }

    /// The unit price a buyer pays: sale price when present and strictly
    /// lower than the base price, otherwise the base price.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        match self.sale_price {
            Some(sale) if sale < self.price => sale,
            _ => self.price,
        }
    }

    /// Effective unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.effective_price().times(self.quantity)
    }
}

/// The shopping cart aggregate.
///
/// An ordered collection of line items (insertion order, for display).
/// All operations are total: bad inputs clamp or no-op rather than
/// error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a cart from a persisted snapshot of line items.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// Add one unit of a product.
    ///
    /// If the product is already in the cart its quantity is incremented,
    /// clamped to the line's stock ceiling. Otherwise a new line item is
    /// appended with quantity 1. A product with zero stock produces no
    /// line item (quantity could never reach 1).
    pub fn add(&mut self, product: &Product) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == product.id) {
            existing.quantity = existing.quantity.saturating_add(1).min(existing.stock);
            return;
        }
        if product.stock == 0 {
            return;
        }
        self.items.push(CartItem::from_product(product));
    }

    /// Remove a line item. Idempotent: absent ids are a no-op.
    pub fn remove(&mut self, id: &ProductId) {
        self.items.retain(|i| &i.id != id);
    }

    /// Set a line item's quantity.
    ///
    /// A quantity of zero behaves exactly like [`Cart::remove`].
    /// Otherwise the quantity is clamped to the line's stock ceiling.
    /// Absent ids are a no-op.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| &i.id == id) {
            item.quantity = quantity.min(item.stock);
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether a product has a line item.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|i| &i.id == id)
    }

    /// Quantity of a product, 0 when absent.
    #[must_use]
    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.items
            .iter()
            .find(|i| &i.id == id)
            .map_or(0, |i| i.quantity)
    }

    /// Total item count: the sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Total amount: the sum of effective price x quantity over all lines.
    #[must_use]
    pub fn total_amount(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::id::ProductId;

    fn product(id: &str, price: i64, sale: Option<i64>, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::from_major(price),
            sale_price: sale.map(Price::from_major),
            image: Some(format!("https://cdn.example.com/{id}.webp")),
            stock,
            category: None,
            rating: None,
            review_count: 0,
        }
    }

    #[test]
    fn test_add_twice_yields_single_line() {
        let mut cart = Cart::new();
        let p = product("a", 1000, None, 5);
        cart.add(&p);
        cart.add(&p);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.quantity_of(&p.id), 2);
    }

    #[test]
    fn test_add_clamps_to_stock() {
        let mut cart = Cart::new();
        let p = product("a", 1000, None, 2);
        for _ in 0..5 {
            cart.add(&p);
        }
        assert_eq!(cart.quantity_of(&p.id), 2);
    }

    #[test]
    fn test_add_zero_stock_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product("a", 1000, None, 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new();
        let p = product("a", 1000, None, 5);
        cart.add(&p);
        cart.set_quantity(&p.id, 0);
        assert!(!cart.contains(&p.id));
        assert_eq!(cart.quantity_of(&p.id), 0);
    }

    #[test]
    fn test_set_quantity_clamps_to_stock() {
        let mut cart = Cart::new();
        let p = product("a", 1000, None, 3);
        cart.add(&p);
        cart.set_quantity(&p.id, 99);
        assert_eq!(cart.quantity_of(&p.id), 3);
    }

    #[test]
    fn test_set_quantity_absent_is_noop() {
        let mut cart = Cart::new();
        cart.set_quantity(&ProductId::new("ghost"), 3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new();
        let p = product("a", 1000, None, 5);
        cart.add(&p);
        cart.remove(&p.id);
        cart.remove(&p.id);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_never_exceeds_stock() {
        let mut cart = Cart::new();
        let p = product("a", 1000, None, 4);
        cart.add(&p);
        cart.set_quantity(&p.id, 4);
        cart.add(&p);
        cart.add(&p);
        cart.set_quantity(&p.id, 100);
        for item in cart.items() {
            assert!(item.quantity <= item.stock);
            assert!(item.quantity >= 1);
        }
        assert_eq!(cart.quantity_of(&p.id), 4);
    }

    #[test]
    fn test_total_amount_uses_sale_price_when_lower() {
        // Item A: price 1000, sale 800, stock 5. Added four times.
        let mut cart = Cart::new();
        let a = product("a", 1000, Some(800), 5);
        for _ in 0..4 {
            cart.add(&a);
        }
        assert_eq!(cart.quantity_of(&a.id), 4);
        assert_eq!(cart.total_amount(), Price::from_major(3200));
    }

    #[test]
    fn test_total_amount_ignores_sale_price_when_higher() {
        let mut cart = Cart::new();
        cart.add(&product("a", 1000, Some(1500), 5));
        assert_eq!(cart.total_amount(), Price::from_major(1000));
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let mut cart = Cart::new();
        let a = product("a", 1000, None, 5);
        let b = product("b", 500, None, 5);
        cart.add(&a);
        cart.add(&a);
        cart.add(&b);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add(&product("a", 1000, None, 5));
        cart.add(&product("b", 500, None, 5));
        cart.add(&product("c", 750, None, 5));
        let ids: Vec<_> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_price_snapshot_not_live_linked() {
        let mut cart = Cart::new();
        let mut p = product("a", 1000, None, 5);
        cart.add(&p);
        // Catalog price changes after the add.
        p.price = Price::from_major(2000);
        cart.add(&p);
        assert_eq!(cart.total_amount(), Price::from_major(2000)); // 2 x 1000
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut cart = Cart::new();
        cart.add(&product("a", 1000, Some(800), 5));
        let json = serde_json::to_string(cart.items()).unwrap();
        let items: Vec<CartItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(Cart::from_items(items), cart);
    }
}
