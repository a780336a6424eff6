//! Wishlist types.
//!
//! The wishlist is owned by the backend; the client only caches it.
//! Items carry a denormalized product snapshot so lists render without
//! extra catalog fetches. Uniqueness by (user, product) is enforced by
//! the backend - a duplicate add comes back as a remote conflict, not a
//! client-side check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{ProductId, UserId, WishlistItemId};
use crate::types::price::Price;

/// A wishlist entry as returned by the wishlist endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    /// Backend wishlist entry identifier.
    pub id: WishlistItemId,
    /// Owning user.
    pub user_id: UserId,
    /// Denormalized product snapshot.
    pub product: WishlistProduct,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
}

/// Denormalized product display fields carried on a wishlist entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistProduct {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Base price.
    pub price: Price,
    /// Sale price, if on sale.
    #[serde(default)]
    pub sale_price: Option<Price>,
    /// Primary image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Units available.
    #[serde(default)]
    pub stock: u32,
}

impl WishlistProduct {
    /// The price a buyer pays today: sale price when present and
    /// strictly lower than the base price, otherwise the base price.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        match self.sale_price {
            Some(sale) if sale < self.price => sale,
            _ => self.price,
        }
    }

    /// Whether any units can currently be purchased.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wishlist_item_deserializes_wire_shape() {
        let json = r#"{
            "id": "wl-1",
            "user_id": "u-1",
            "product": {
                "id": "p-1",
                "name": "Desk Lamp",
                "price": "4500",
                "sale_price": "3800"
            },
            "created_at": "2026-02-10T09:30:00Z"
        }"#;
        let item: WishlistItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.product.id, ProductId::new("p-1"));
        assert_eq!(item.product.sale_price, Some(Price::from_major(3800)));
        assert_eq!(item.product.stock, 0);
    }
}
