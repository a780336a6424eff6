//! REST API client for the QuickCart backend.
//!
//! Uses `reqwest` with a client-wide timeout from [`ClientConfig`].
//! Responses are read as text first so decode failures can be logged
//! with a body excerpt; HTTP 429 is mapped to [`ApiError::RateLimited`]
//! with the parsed `Retry-After` value.
//!
//! Endpoint methods are split per resource:
//! [`products`], [`wishlist`], [`orders`], [`reviews`].

mod orders;
mod products;
mod reviews;
mod wishlist;

use std::future::Future;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use quickcart_core::{ProductId, ProductPage, ProductQuery, WishlistItem};

use crate::config::ClientConfig;

/// Errors from backend API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request hit its deadline. Surfaced separately so checkout can
    /// show a retry-capable timeout message distinct from generic failure.
    #[error("Request timed out")]
    Timeout,

    /// Backend answered 429; retry after the given number of seconds.
    #[error("Rate limited, retry after {0}s")]
    RateLimited(u64),

    /// Resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-2xx response from the backend.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Body excerpt for diagnostics.
        message: String,
    },

    /// Response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A URL path could not be joined onto the base URL.
    #[error("Invalid endpoint path: {0}")]
    InvalidPath(String),
}

/// Source of paginated product listings.
///
/// The seam between the fetch cache and the network, so the cache layer
/// is testable against a stub backend.
pub trait ProductSource: Send + Sync + 'static {
    /// Fetch one page of products for a listing query.
    fn list_products(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = Result<ProductPage, ApiError>> + Send;
}

/// Remote wishlist operations, bearer-token authenticated.
///
/// The seam between the wishlist store and the network.
pub trait WishlistApi: Send + Sync {
    /// Fetch the authenticated user's full wishlist.
    fn fetch_wishlist(
        &self,
        token: &SecretString,
    ) -> impl Future<Output = Result<Vec<WishlistItem>, ApiError>> + Send;

    /// Add a product; returns the created entry.
    fn add_wishlist_item(
        &self,
        token: &SecretString,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<WishlistItem, ApiError>> + Send;

    /// Remove a product from the wishlist.
    fn remove_wishlist_item(
        &self,
        token: &SecretString,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Remove every entry from the wishlist.
    fn clear_wishlist(
        &self,
        token: &SecretString,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Move a wishlist entry into the server-side cart representation.
    fn move_wishlist_item_to_cart(
        &self,
        token: &SecretString,
        product_id: &ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the QuickCart REST backend.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    /// Separate client with the (shorter) payment initialization timeout.
    payment_http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let payment_http = reqwest::Client::builder()
            .timeout(config.payment_timeout)
            .build()?;

        // A trailing slash keeps Url::join from eating the last path segment.
        let mut base_url = config.api_base_url.clone();
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                payment_http,
                base_url,
            }),
        })
    }

    /// The shared HTTP client.
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    /// The payment-timeout HTTP client.
    pub(crate) fn payment_http(&self) -> &reqwest::Client {
        &self.inner.payment_http
    }

    /// Join a path onto the configured base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidPath(format!("{path}: {e}")))
    }

    /// Attach a bearer token to a request.
    pub(crate) fn authorize(
        request: reqwest::RequestBuilder,
        token: &SecretString,
    ) -> reqwest::RequestBuilder {
        request.bearer_auth(token.expose_secret())
    }

    /// Send a request and decode a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send_checked(request).await?;
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %excerpt(&body, 500),
                    "Failed to decode backend response"
                );
                Err(ApiError::Decode(e))
            }
        }
    }

    /// Send a request, discarding any response body.
    pub(crate) async fn send_no_content(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(), ApiError> {
        self.send_checked(request).await.map(|_| ())
    }

    /// Send a request, map transport/status errors, return the body text.
    async fn send_checked(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();

        // Check for rate limiting before anything else
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await.map_err(map_transport_error)?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(excerpt(&body, 200)));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %excerpt(&body, 500),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: excerpt(&body, 200),
            });
        }

        Ok(body)
    }
}

/// Map a `reqwest` error, pulling timeouts out as their own variant.
fn map_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Http(e)
    }
}

/// Truncate a body for log output.
fn excerpt(body: &str, limit: usize) -> String {
    body.chars().take(limit).collect()
}
