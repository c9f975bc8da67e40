//! Session-related types.
//!
//! The cart is the only state stored in the session. It is created empty on
//! first use, reset on successful checkout, and gone when the session ends.

/// Session keys for cart data.
pub mod keys {
    /// Key for storing the session cart.
    pub const CART: &str = "cart";
}
