//! Order and payment handoff types.
//!
//! Order creation takes a snapshot of the cart lines; payment
//! initialization hands off to an external provider via a redirect URL.

use serde::{Deserialize, Serialize};

use crate::types::cart::CartItem;
use crate::types::id::{OrderId, ProductId};
use crate::types::price::Price;

/// One line of an order, snapshotted from a cart line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product identifier.
    pub product_id: ProductId,
    /// Quantity ordered.
    pub quantity: u32,
    /// Effective unit price at checkout time.
    pub unit_price: Price,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.id.clone(),
            quantity: item.quantity,
            unit_price: item.effective_price(),
        }
    }
}

/// Shipping destination for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Recipient full name.
    pub full_name: String,
    /// Street address.
    pub street: String,
    /// City.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Contact phone number.
    pub phone: String,
}

/// Payload for `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Order lines, snapshotted from the cart.
    pub lines: Vec<OrderLine>,
    /// Where to ship.
    pub shipping: ShippingAddress,
}

impl NewOrder {
    /// Build an order from cart line items and a shipping address.
    #[must_use]
    pub fn from_cart_items(items: &[CartItem], shipping: ShippingAddress) -> Self {
        Self {
            lines: items.iter().map(OrderLine::from).collect(),
            shipping,
        }
    }

    /// Sum of `unit_price x quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines
            .iter()
            .map(|l| l.unit_price.times(l.quantity))
            .sum()
    }
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, awaiting payment.
    Pending,
    /// Payment confirmed.
    Paid,
    /// Handed to fulfillment.
    Processing,
    /// Shipped to the buyer.
    Shipped,
    /// Delivered.
    Delivered,
    /// Cancelled before fulfillment.
    Cancelled,
}

/// An order as returned by `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Backend order identifier.
    pub id: OrderId,
    /// Current status.
    pub status: OrderStatus,
    /// Order lines.
    pub lines: Vec<OrderLine>,
    /// Total amount due.
    pub total: Price,
}

/// Payment provider handoff returned by payment initialization.
///
/// The client redirects the buyer to `authorization_url` and later
/// reconciles by `reference`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    /// External provider checkout URL.
    pub authorization_url: String,
    /// Provider reference for reconciliation.
    pub reference: String,
}
