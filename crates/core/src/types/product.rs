//! Product catalog types and the listing query tuple.
//!
//! `ProductQuery` doubles as the fetch-cache key: two queries that
//! compare equal must resolve to the same cached page, so every field
//! that changes the backend's answer is part of the tuple.

use serde::{Deserialize, Serialize};

use crate::types::id::{CategoryId, ProductId};
use crate::types::price::Price;

// =============================================================================
// Products & Categories
// =============================================================================

/// A product as returned by the catalog endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Backend product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long-form description (may be empty).
    #[serde(default)]
    pub description: String,
    /// Base price.
    pub price: Price,
    /// Discounted price, if the product is on sale.
    #[serde(default)]
    pub sale_price: Option<Price>,
    /// Primary image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Units available for purchase.
    pub stock: u32,
    /// Owning category, if categorized.
    #[serde(default)]
    pub category: Option<CategoryId>,
    /// Average review rating (1.0 - 5.0), if reviewed.
    #[serde(default)]
    pub rating: Option<f64>,
    /// Number of reviews behind the rating.
    #[serde(default)]
    pub review_count: u64,
}

impl Product {
    /// The price a buyer actually pays: the sale price when present and
    /// strictly lower than the base price, otherwise the base price.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        match self.sale_price {
            Some(sale) if sale < self.price => sale,
            _ => self.price,
        }
    }

    /// Whether any units can currently be purchased.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A product category with its product count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Backend category identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Number of products in the category.
    #[serde(default)]
    pub product_count: u64,
}

// =============================================================================
// Listing Queries
// =============================================================================

/// Sort field for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Listing creation time (newest first under `Desc`).
    #[default]
    CreatedAt,
    /// Unit price.
    Price,
    /// Alphabetical by name.
    Name,
    /// Average review rating.
    Rating,
}

impl SortBy {
    /// Query-string value understood by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Price => "price",
            Self::Name => "name",
            Self::Rating => "rating",
        }
    }
}

/// Sort direction for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Descending (default: newest / most expensive first).
    #[default]
    Desc,
    /// Ascending.
    Asc,
}

impl SortOrder {
    /// Query-string value understood by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Desc => "desc",
            Self::Asc => "asc",
        }
    }
}

/// A paginated, filterable product listing query.
///
/// Identical tuples hash and compare equal, which makes this the cache
/// key for the fetch layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Restrict to a category.
    pub category: Option<CategoryId>,
    /// Free-text search.
    pub search: Option<String>,
    /// Sort field.
    pub sort_by: SortBy,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// Inclusive minimum price filter, in whole major units.
    pub price_min: Option<i64>,
    /// Inclusive maximum price filter, in whole major units.
    pub price_max: Option<i64>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 12,
            category: None,
            search: None,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            price_min: None,
            price_max: None,
        }
    }
}

impl ProductQuery {
    /// The default listing at a given page size.
    #[must_use]
    pub fn first_page(limit: u32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Restrict to a category.
    #[must_use]
    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    /// Add a free-text search term.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Jump to a page.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set sorting.
    #[must_use]
    pub fn with_sort(mut self, sort_by: SortBy, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    /// Set the price range filter (either bound optional).
    #[must_use]
    pub fn with_price_range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.price_min = min;
        self.price_max = max;
        self
    }

    /// The same query one page further.
    #[must_use]
    pub fn next_page(&self) -> Self {
        let mut next = self.clone();
        next.page = self.page.saturating_add(1);
        next
    }

    /// The same query one page back, or `None` on the first page.
    #[must_use]
    pub fn prev_page(&self) -> Option<Self> {
        if self.page <= 1 {
            return None;
        }
        let mut prev = self.clone();
        prev.page = self.page - 1;
        Some(prev)
    }

    /// Render as URL query pairs for the `GET /products` endpoint.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("sortBy", self.sort_by.as_str().to_string()),
            ("sortOrder", self.sort_order.as_str().to_string()),
        ];
        if let Some(category) = &self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(min) = self.price_min {
            pairs.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.price_max {
            pairs.push(("maxPrice", max.to_string()));
        }
        pairs
    }
}

/// One page of a product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Products on this page, in backend order.
    pub products: Vec<Product>,
    /// 1-based page number.
    pub page: u32,
    /// Total pages for the query.
    pub total_pages: u32,
    /// Total products matching the query.
    pub total_count: u64,
}

impl ProductPage {
    /// Whether a further page exists.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(price: i64, sale: Option<i64>) -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Widget".to_string(),
            description: String::new(),
            price: Price::new(Decimal::from(price)),
            sale_price: sale.map(|s| Price::new(Decimal::from(s))),
            image: None,
            stock: 5,
            category: None,
            rating: None,
            review_count: 0,
        }
    }

    #[test]
    fn test_effective_price_prefers_lower_sale() {
        assert_eq!(
            product(1000, Some(800)).effective_price(),
            Price::from_major(800)
        );
    }

    #[test]
    fn test_effective_price_ignores_higher_sale() {
        assert_eq!(
            product(1000, Some(1200)).effective_price(),
            Price::from_major(1000)
        );
    }

    #[test]
    fn test_effective_price_without_sale() {
        assert_eq!(product(1000, None).effective_price(), Price::from_major(1000));
    }

    #[test]
    fn test_identical_queries_are_equal_keys() {
        let a = ProductQuery::first_page(12)
            .with_category(CategoryId::new("cat-1"))
            .with_search("lamp")
            .with_sort(SortBy::Price, SortOrder::Asc)
            .with_price_range(Some(100), Some(5000));
        let b = ProductQuery::first_page(12)
            .with_category(CategoryId::new("cat-1"))
            .with_search("lamp")
            .with_sort(SortBy::Price, SortOrder::Asc)
            .with_price_range(Some(100), Some(5000));
        assert_eq!(a, b);

        let c = b.clone().with_page(2);
        assert_ne!(a, c);
    }

    #[test]
    fn test_page_navigation() {
        let q = ProductQuery::default();
        assert_eq!(q.next_page().page, 2);
        assert!(q.prev_page().is_none());
        assert_eq!(q.next_page().prev_page().unwrap(), q);
    }

    #[test]
    fn test_query_pairs_include_filters() {
        let q = ProductQuery::first_page(24)
            .with_search("desk")
            .with_price_range(Some(50), None);
        let pairs = q.to_query_pairs();
        assert!(pairs.contains(&("limit", "24".to_string())));
        assert!(pairs.contains(&("search", "desk".to_string())));
        assert!(pairs.contains(&("minPrice", "50".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "maxPrice"));
    }
}
