//! Product catalog endpoints.

use tracing::instrument;

use quickcart_core::{Category, Product, ProductId, ProductPage, ProductQuery};

use super::{ApiClient, ApiError, ProductSource};

impl ApiClient {
    /// Get a paginated, filterable product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(page = query.page, limit = query.limit))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let mut url = self.endpoint("products")?;
        url.query_pairs_mut().extend_pairs(query.to_query_pairs());
        self.send_json(self.http().get(url)).await
    }

    /// Get a single product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: &ProductId) -> Result<Product, ApiError> {
        let url = self.endpoint(&format!("products/{product_id}"))?;
        self.send_json(self.http().get(url)).await
    }

    /// Get the category list with product counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.endpoint("categories")?;
        self.send_json(self.http().get(url)).await
    }
}

impl ProductSource for ApiClient {
    async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        Self::list_products(self, query).await
    }
}
