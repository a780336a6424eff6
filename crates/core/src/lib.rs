//! QuickCart Core - Shared domain types.
//!
//! This crate provides the types shared by every QuickCart component:
//! - `client` - Storefront client (stores, fetch cache, REST API)
//! - `integration-tests` - Cross-component test suite
//!
//! # Architecture
//!
//! The core crate contains only types and pure aggregate logic - no I/O,
//! no HTTP clients, no persistence. This keeps it lightweight and allows
//! it to be used anywhere, including in synchronous contexts.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products, the cart aggregate,
//!   wishlist items, reviews, and orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
