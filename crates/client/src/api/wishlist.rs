//! Wishlist endpoints (bearer-token authenticated).
//!
//! The backend enforces (user, product) uniqueness; a duplicate add
//! comes back as an HTTP conflict and surfaces as [`ApiError::Status`].

use secrecy::SecretString;
use serde::Serialize;
use tracing::instrument;

use quickcart_core::{ProductId, WishlistItem};

use super::{ApiClient, ApiError, WishlistApi};

#[derive(Serialize)]
struct MoveToCartBody {
    quantity: u32,
}

impl ApiClient {
    /// Fetch the authenticated user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn fetch_wishlist(
        &self,
        token: &SecretString,
    ) -> Result<Vec<WishlistItem>, ApiError> {
        let url = self.endpoint("wishlist")?;
        self.send_json(Self::authorize(self.http().get(url), token))
            .await
    }

    /// Add a product to the wishlist; returns the created entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails (including a conflict
    /// for an already-wishlisted product).
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn add_wishlist_item(
        &self,
        token: &SecretString,
        product_id: &ProductId,
    ) -> Result<WishlistItem, ApiError> {
        let url = self.endpoint(&format!("wishlist/{product_id}"))?;
        self.send_json(Self::authorize(self.http().post(url), token))
            .await
    }

    /// Remove a product from the wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn remove_wishlist_item(
        &self,
        token: &SecretString,
        product_id: &ProductId,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("wishlist/{product_id}"))?;
        self.send_no_content(Self::authorize(self.http().delete(url), token))
            .await
    }

    /// Remove every entry from the wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn clear_wishlist(&self, token: &SecretString) -> Result<(), ApiError> {
        let url = self.endpoint("wishlist")?;
        self.send_no_content(Self::authorize(self.http().delete(url), token))
            .await
    }

    /// Move a wishlist entry into the server-side cart representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id, quantity))]
    pub async fn move_wishlist_item_to_cart(
        &self,
        token: &SecretString,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("wishlist/{product_id}/move-to-cart"))?;
        let request = Self::authorize(self.http().post(url), token).json(&MoveToCartBody {
            quantity,
        });
        self.send_no_content(request).await
    }
}

impl WishlistApi for ApiClient {
    async fn fetch_wishlist(&self, token: &SecretString) -> Result<Vec<WishlistItem>, ApiError> {
        Self::fetch_wishlist(self, token).await
    }

    async fn add_wishlist_item(
        &self,
        token: &SecretString,
        product_id: &ProductId,
    ) -> Result<WishlistItem, ApiError> {
        Self::add_wishlist_item(self, token, product_id).await
    }

    async fn remove_wishlist_item(
        &self,
        token: &SecretString,
        product_id: &ProductId,
    ) -> Result<(), ApiError> {
        Self::remove_wishlist_item(self, token, product_id).await
    }

    async fn clear_wishlist(&self, token: &SecretString) -> Result<(), ApiError> {
        Self::clear_wishlist(self, token).await
    }

    async fn move_wishlist_item_to_cart(
        &self,
        token: &SecretString,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        Self::move_wishlist_item_to_cart(self, token, product_id, quantity).await
    }
}
