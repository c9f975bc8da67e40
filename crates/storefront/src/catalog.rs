//! Static product catalog seed.
//!
//! The catalog source is a fixed ordered list loaded once at startup; the
//! application never mutates it.

use rust_decimal::Decimal;
use veggie_go_core::{Catalog, CatalogError, Product, ProductId};

/// Build the produce catalog served by the storefront.
///
/// # Errors
///
/// Returns an error if the seed data violates catalog invariants.
pub fn load() -> Result<Catalog, CatalogError> {
    Catalog::new(vec![
        produce(
            1,
            "Tomato",
            250,
            "https://picsum.photos/200/150",
            "Vine-ripened and ready for salads and sauces.",
        ),
        produce(
            2,
            "Cucumber",
            175,
            "https://picsum.photos/200/151",
            "Crisp, cool, and great for pickling.",
        ),
        produce(
            3,
            "Spinach",
            300,
            "https://picsum.photos/200/152",
            "Tender leaves packed with iron.",
        ),
        produce(
            4,
            "Carrot",
            125,
            "https://picsum.photos/200/153",
            "Sweet and crunchy, straight from the soil.",
        ),
        produce(
            5,
            "Bell Pepper",
            200,
            "https://picsum.photos/200/154",
            "Bright, mild, and perfect for roasting.",
        ),
        produce(
            6,
            "Broccoli",
            350,
            "https://picsum.photos/200/155",
            "Firm green florets for steaming or stir-fry.",
        ),
    ])
}

/// Build a product record with a price given in cents.
fn produce(id: i32, name: &str, price_cents: i64, image_url: &str, description: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Decimal::new(price_cents, 2),
        image_url: image_url.to_string(),
        description: description.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_catalog_is_valid() {
        let catalog = load().expect("seed catalog is valid");
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn test_seed_catalog_order_and_prices() {
        let catalog = load().expect("seed catalog is valid");
        let names: Vec<_> = catalog.products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["Tomato", "Cucumber", "Spinach", "Carrot", "Bell Pepper", "Broccoli"]
        );
        assert_eq!(
            catalog.get(ProductId::new(1)).map(|p| p.price),
            Some(Decimal::new(250, 2))
        );
    }
}
