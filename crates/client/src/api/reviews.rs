//! Review CRUD endpoints.

use secrecy::SecretString;
use tracing::instrument;

use quickcart_core::{NewReview, ProductId, Review, ReviewId, ReviewUpdate};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// List reviews for a product (public, newest first).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product_reviews(&self, product_id: &ProductId) -> Result<Vec<Review>, ApiError> {
        let url = self.endpoint(&format!("reviews/product/{product_id}"))?;
        self.send_json(self.http().get(url)).await
    }

    /// Post a review.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token, review), fields(product_id = %review.product_id))]
    pub async fn create_review(
        &self,
        token: &SecretString,
        review: &NewReview,
    ) -> Result<Review, ApiError> {
        let url = self.endpoint("reviews")?;
        self.send_json(Self::authorize(self.http().post(url), token).json(review))
            .await
    }

    /// Update an existing review; omitted fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token, update), fields(review_id = %review_id))]
    pub async fn update_review(
        &self,
        token: &SecretString,
        review_id: &ReviewId,
        update: &ReviewUpdate,
    ) -> Result<Review, ApiError> {
        let url = self.endpoint(&format!("reviews/{review_id}"))?;
        self.send_json(Self::authorize(self.http().put(url), token).json(update))
            .await
    }

    /// Delete a review.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(review_id = %review_id))]
    pub async fn delete_review(
        &self,
        token: &SecretString,
        review_id: &ReviewId,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("reviews/{review_id}"))?;
        self.send_no_content(Self::authorize(self.http().delete(url), token))
            .await
    }

    /// Mark a review as helpful.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(review_id = %review_id))]
    pub async fn mark_review_helpful(
        &self,
        token: &SecretString,
        review_id: &ReviewId,
    ) -> Result<Review, ApiError> {
        let url = self.endpoint(&format!("reviews/{review_id}/helpful"))?;
        self.send_json(Self::authorize(self.http().post(url), token))
            .await
    }
}
