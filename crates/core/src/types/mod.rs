//! Core types for QuickCart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod review;
pub mod wishlist;

pub use cart::{Cart, CartItem};
pub use id::*;
pub use order::{NewOrder, Order, OrderLine, OrderStatus, PaymentSession, ShippingAddress};
pub use price::Price;
pub use product::{Category, Product, ProductPage, ProductQuery, SortBy, SortOrder};
pub use review::{NewReview, Review, ReviewUpdate};
pub use wishlist::{WishlistItem, WishlistProduct};
