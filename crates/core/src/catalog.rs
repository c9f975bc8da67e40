//! The product catalog: an immutable ordered list of purchasable products.
//!
//! The catalog is loaded once at startup and never mutated. Cart lines
//! reference products by id only and re-join against the catalog at read
//! time, so display data is never duplicated into the cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ProductId;

/// Errors produced when constructing a [`Catalog`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two products share the same id.
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),

    /// A product carries a negative price.
    #[error("negative price for product: {0}")]
    NegativePrice(ProductId),
}

/// A purchasable product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable identity key, unique within the catalog.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price in the shop's currency.
    pub price: Decimal,
    /// Image reference; treated as opaque, never validated.
    pub image_url: String,
    /// Display description.
    pub description: String,
}

/// Immutable ordered list of products.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog from an ordered list of products.
    ///
    /// # Errors
    ///
    /// Returns an error if two products share an id or a product has a
    /// negative price.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if product.price.is_sign_negative() {
                return Err(CatalogError::NegativePrice(product.id));
            }
        }
        Ok(Self { products })
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products whose name matches the query, in catalog order.
    ///
    /// An empty query returns the full catalog.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| name_matches(&product.name, query))
            .collect()
    }
}

/// Case-insensitive substring predicate shared by the product grid and the
/// cart panel. An empty or whitespace-only query matches everything.
#[must_use]
pub fn name_matches(name: &str, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&query.to_lowercase())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i32, name: &str, price_cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::new(price_cents, 2),
            image_url: format!("https://example.com/{id}.jpg"),
            description: String::new(),
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            product(1, "Tomato", 250),
            product(2, "Cucumber", 175),
            product(3, "Spinach", 300),
        ])
        .expect("valid catalog")
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = Catalog::new(vec![product(1, "Tomato", 250), product(1, "Cucumber", 175)]);
        assert_eq!(result.unwrap_err(), CatalogError::DuplicateId(ProductId::new(1)));
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = Catalog::new(vec![product(1, "Tomato", -250)]);
        assert_eq!(
            result.unwrap_err(),
            CatalogError::NegativePrice(ProductId::new(1))
        );
    }

    #[test]
    fn test_get_by_id() {
        let catalog = catalog();
        assert_eq!(
            catalog.get(ProductId::new(2)).map(|p| p.name.as_str()),
            Some("Cucumber")
        );
        assert!(catalog.get(ProductId::new(99)).is_none());
    }

    #[test]
    fn test_search_empty_query_returns_all_in_order() {
        let catalog = catalog();
        let names: Vec<_> = catalog.search("").iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Tomato", "Cucumber", "Spinach"]);
    }

    #[test]
    fn test_search_no_match_returns_empty() {
        assert!(catalog().search("zz-no-match").is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = catalog();
        let upper: Vec<_> = catalog.search("TOMATO").iter().map(|p| p.id).collect();
        let lower: Vec<_> = catalog.search("tomato").iter().map(|p| p.id).collect();
        assert_eq!(upper, lower);
        assert_eq!(upper, [ProductId::new(1)]);
    }

    #[test]
    fn test_search_substring() {
        let catalog = catalog();
        let names: Vec<_> = catalog.search("c").iter().map(|p| p.name.as_str()).collect();
        // "c" appears in Cucumber and Spinach
        assert_eq!(names, ["Cucumber", "Spinach"]);
    }

    #[test]
    fn test_name_matches_trims_query() {
        assert!(name_matches("Tomato", "  tom  "));
        assert!(name_matches("Tomato", "   "));
        assert!(!name_matches("Tomato", "cucumber"));
    }
}
