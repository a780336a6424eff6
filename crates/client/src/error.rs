//! Unified error type for storefront call sites.
//!
//! Components keep their own error enums ([`ApiError`](crate::api::ApiError),
//! [`WishlistError`](crate::store::WishlistError),
//! [`ConfigError`](crate::config::ConfigError)); `ClientError` folds
//! them together for call sites that want a single `Result` type.
//!
//! Persistence corruption never appears here: a malformed durable cart
//! snapshot is discarded and the store starts empty.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::store::WishlistError;

/// Top-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration failed to load.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A backend API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A wishlist operation failed.
    #[error("Wishlist error: {0}")]
    Wishlist(#[from] WishlistError),
}

impl ClientError {
    /// Whether this failure is a request timeout.
    ///
    /// Checkout UIs use this to render a retry-capable timeout message
    /// instead of a generic failure.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Api(ApiError::Timeout) | Self::Wishlist(WishlistError::Api(ApiError::Timeout))
        )
    }

    /// Whether this failure requires the user to sign in first.
    #[must_use]
    pub const fn is_auth_required(&self) -> bool {
        matches!(self, Self::Wishlist(WishlistError::AuthRequired))
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;
