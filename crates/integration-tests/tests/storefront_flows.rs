//! End-to-end storefront flows across stores.
//!
//! The cart is device-local and the wishlist is server-owned; these
//! tests pin the contracts between them, in particular that moving a
//! wishlist entry to the cart is two explicit steps at the call site.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use quickcart_client::store::{AuthSession, CartStore, MemoryStorage, WishlistStore};
use quickcart_core::Price;
use quickcart_integration_tests::{StubWishlistBackend, product, wishlist_entry};

fn cart() -> CartStore {
    CartStore::new(Arc::new(MemoryStorage::new()))
}

#[tokio::test]
async fn test_move_to_cart_is_two_explicit_steps() {
    let lamp = product("lamp-1", 1000, Some(800), 5);
    let backend = StubWishlistBackend {
        initial: vec![wishlist_entry("u-1", &lamp)],
        ..StubWishlistBackend::default()
    };
    let wishlist = WishlistStore::new(backend);
    wishlist
        .sign_in(AuthSession::new("u-1", "tok-1"))
        .await
        .unwrap();
    let cart = cart();

    // Step 1: the wishlist store only talks to the backend and drops
    // the local entry. The cart is untouched.
    wishlist.move_to_cart(&lamp.id, 1).await.unwrap();
    assert!(!wishlist.is_in_wishlist(&lamp.id).await);
    assert!(cart.is_empty());

    // Step 2: the call site adds to the local cart explicitly.
    cart.add_to_cart(&lamp);
    assert_eq!(cart.item_quantity(&lamp.id), 1);
    assert_eq!(cart.total_amount(), Price::from_major(800));
}

#[tokio::test]
async fn test_cart_works_signed_out_wishlist_does_not() {
    let lamp = product("lamp-1", 1000, None, 5);
    let wishlist = WishlistStore::new(StubWishlistBackend::default());
    let cart = cart();

    // The cart belongs to the device, not the account.
    cart.add_to_cart(&lamp);
    assert_eq!(cart.item_count(), 1);

    // The wishlist refuses without a session, before any network call.
    let err = wishlist.add_to_wishlist(&lamp.id).await.unwrap_err();
    assert!(quickcart_client::ClientError::from(err).is_auth_required());
}

#[tokio::test]
async fn test_sign_out_clears_wishlist_but_not_cart() {
    let lamp = product("lamp-1", 1000, None, 5);
    let backend = StubWishlistBackend {
        initial: vec![wishlist_entry("u-1", &lamp)],
        ..StubWishlistBackend::default()
    };
    let wishlist = WishlistStore::new(backend);
    wishlist
        .sign_in(AuthSession::new("u-1", "tok-1"))
        .await
        .unwrap();
    let cart = cart();
    cart.add_to_cart(&lamp);

    wishlist.sign_out().await;

    assert!(wishlist.items().await.is_empty());
    assert_eq!(cart.item_count(), 1);
}

#[tokio::test]
async fn test_sale_pricing_consistent_across_stores() {
    // price 1000, salePrice 800: both stores bill the effective price.
    let lamp = product("lamp-1", 1000, Some(800), 10);
    let cart = cart();
    for _ in 0..4 {
        cart.add_to_cart(&lamp);
    }
    assert_eq!(cart.total_amount(), Price::from_major(3200));

    let entry = wishlist_entry("u-1", &lamp);
    assert_eq!(entry.product.effective_price(), Price::from_major(800));
}
