//! The per-session shopping cart.
//!
//! A cart is a mapping from product id to a positive quantity. Absence of a
//! key means quantity zero; a key is never stored with a quantity of zero or
//! below. The cart lives for the session only - it is created empty, reset on
//! successful checkout, and never persisted.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::types::ProductId;

/// A session cart: product id -> quantity, with every quantity >= 1.
///
/// Iteration order is product id order, so rendered cart lines are stable
/// across mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: BTreeMap<ProductId, u32>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a product (absent -> 1).
    pub fn add(&mut self, id: ProductId) {
        let quantity = self.lines.entry(id).or_insert(0);
        *quantity = quantity.saturating_add(1);
    }

    /// Add one unit of a product.
    ///
    /// Same contract as [`Cart::add`]; kept as a distinct operation because
    /// it is invoked from the cart panel rather than the product grid.
    pub fn increase(&mut self, id: ProductId) {
        self.add(id);
    }

    /// Remove one unit of a product. A line at quantity 1 is removed
    /// entirely; an absent product is a no-op.
    pub fn decrease(&mut self, id: ProductId) {
        let Some(&quantity) = self.lines.get(&id) else {
            return;
        };
        if quantity > 1 {
            self.lines.insert(id, quantity - 1);
        } else {
            self.lines.remove(&id);
        }
    }

    /// Remove a product's line entirely, regardless of quantity. Succeeds
    /// even if the product is absent.
    pub fn remove(&mut self, id: ProductId) {
        self.lines.remove(&id);
    }

    /// Empty the cart. Called after a successful checkout.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Current quantity for a product; 0 when absent.
    #[must_use]
    pub fn quantity(&self, id: ProductId) -> u32 {
        self.lines.get(&id).copied().unwrap_or(0)
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Cart lines in product id order.
    pub fn lines(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.lines.iter().map(|(&id, &quantity)| (id, quantity))
    }

    /// Total number of units across all lines; 0 for an empty cart.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines
            .values()
            .fold(0_u32, |total, &quantity| total.saturating_add(quantity))
    }

    /// Total price of the cart: sum of quantity x catalog price per line.
    ///
    /// A line whose product is missing from the catalog contributes zero;
    /// given catalog immutability this should not occur.
    #[must_use]
    pub fn total_price(&self, catalog: &Catalog) -> Decimal {
        self.lines
            .iter()
            .map(|(&id, &quantity)| {
                catalog
                    .get(id)
                    .map_or(Decimal::ZERO, |product| product.price * Decimal::from(quantity))
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;

    fn product(id: i32, name: &str, price_cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::new(price_cents, 2),
            image_url: String::new(),
            description: String::new(),
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            product(1, "Tomato", 250),
            product(3, "Spinach", 300),
        ])
        .expect("valid catalog")
    }

    fn id(raw: i32) -> ProductId {
        ProductId::new(raw)
    }

    #[test]
    fn test_add_starts_at_one_and_accumulates() {
        let mut cart = Cart::new();
        cart.add(id(1));
        assert_eq!(cart.quantity(id(1)), 1);
        cart.add(id(1));
        assert_eq!(cart.quantity(id(1)), 2);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_increase_matches_add() {
        let mut via_add = Cart::new();
        via_add.add(id(1));
        via_add.add(id(1));

        let mut via_increase = Cart::new();
        via_increase.add(id(1));
        via_increase.increase(id(1));

        assert_eq!(via_add, via_increase);
    }

    #[test]
    fn test_decrease_removes_line_at_one() {
        let mut cart = Cart::new();
        cart.add(id(1));
        cart.add(id(1));
        cart.decrease(id(1));
        assert_eq!(cart.quantity(id(1)), 1);
        cart.decrease(id(1));
        assert_eq!(cart.quantity(id(1)), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrease_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(id(1));
        let before = cart.clone();
        cart.decrease(id(99));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_deletes_regardless_of_quantity() {
        let mut cart = Cart::new();
        cart.add(id(1));
        cart.add(id(1));
        cart.add(id(1));
        cart.remove(id(1));
        assert!(cart.is_empty());

        // Removing an absent product succeeds as a no-op.
        cart.remove(id(1));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_empties_all_lines() {
        let mut cart = Cart::new();
        cart.add(id(1));
        cart.add(id(3));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_quantities_stay_positive_over_any_sequence() {
        let mut cart = Cart::new();
        let ops: &[(&str, i32)] = &[
            ("add", 1),
            ("decrease", 1),
            ("decrease", 1),
            ("add", 3),
            ("increase", 3),
            ("decrease", 3),
            ("remove", 3),
            ("decrease", 3),
            ("add", 1),
            ("add", 3),
            ("remove", 1),
            ("increase", 1),
        ];

        for &(op, raw) in ops {
            match op {
                "add" => cart.add(id(raw)),
                "increase" => cart.increase(id(raw)),
                "decrease" => cart.decrease(id(raw)),
                "remove" => cart.remove(id(raw)),
                _ => unreachable!(),
            }
            for (_, quantity) in cart.lines() {
                assert!(quantity >= 1, "stored quantity must be positive");
            }
        }
    }

    #[test]
    fn test_total_items_sums_quantities() {
        let mut cart = Cart::new();
        assert_eq!(cart.total_items(), 0);
        cart.add(id(1));
        cart.add(id(1));
        cart.add(id(3));
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_total_price_multiplies_and_sums() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add(id(1));
        cart.add(id(1));
        cart.add(id(3));
        // 2 x 2.50 + 1 x 3.00
        assert_eq!(cart.total_price(&catalog), Decimal::new(800, 2));
    }

    #[test]
    fn test_total_price_is_linear_in_added_units() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add(id(3));
        let before = cart.total_price(&catalog);
        cart.add(id(1));
        assert_eq!(cart.total_price(&catalog) - before, Decimal::new(250, 2));
    }

    #[test]
    fn test_unknown_product_contributes_zero() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add(id(42));
        assert_eq!(cart.total_price(&catalog), Decimal::ZERO);
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_single_product_add_decrease_walkthrough() {
        let catalog = catalog();
        let mut cart = Cart::new();

        cart.add(id(1));
        assert_eq!(cart.total_items(), 1);
        assert_eq!(cart.total_price(&catalog), Decimal::new(250, 2));

        cart.add(id(1));
        assert_eq!(cart.quantity(id(1)), 2);
        assert_eq!(cart.total_items(), 2);

        cart.decrease(id(1));
        assert_eq!(cart.quantity(id(1)), 1);

        cart.decrease(id(1));
        assert_eq!(cart.quantity(id(1)), 0);
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut cart = Cart::new();
        cart.add(id(1));
        cart.add(id(1));
        cart.add(id(3));

        let json = serde_json::to_string(&cart).expect("serialize");
        let back: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cart);
    }
}
