//! Integration tests for VeggieGo.
//!
//! Tests live in `tests/` and exercise the public APIs of the core and
//! storefront crates together:
//!
//! - `cart_flow` - cart state machine scenarios against the seed catalog
//! - `search_filter` - the shared query over the grid and the cart panel
//! - `checkout_flow` - the checkout adapter against fixed payment clients

#![cfg_attr(not(test), forbid(unsafe_code))]
