//! Product review types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{ProductId, ReviewId, UserId};

/// A product review as returned by the review endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Backend review identifier.
    pub id: ReviewId,
    /// Reviewed product.
    pub product_id: ProductId,
    /// Reviewing user.
    pub user_id: UserId,
    /// Star rating, 1 through 5.
    pub rating: u8,
    /// Optional headline.
    #[serde(default)]
    pub title: Option<String>,
    /// Review body.
    pub comment: String,
    /// How many shoppers marked the review helpful.
    #[serde(default)]
    pub helpful_count: u64,
    /// When the review was posted.
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /reviews`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    /// Product being reviewed.
    pub product_id: ProductId,
    /// Star rating, 1 through 5.
    pub rating: u8,
    /// Optional headline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Review body.
    pub comment: String,
}

/// Payload for `PUT /reviews/:id`. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewUpdate {
    /// New star rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// New headline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
