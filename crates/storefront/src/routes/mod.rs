//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (product grid + cart panel)
//! GET  /health                 - Health check
//!
//! # Products (HTMX fragments)
//! GET  /products/grid          - Product grid filtered by the live query
//!
//! # Cart (HTMX fragments)
//! GET  /cart/panel             - Cart panel, narrowed by the live query
//! GET  /cart/count             - Cart count badge
//! POST /cart/add               - Add one unit (returns toast, triggers cart-updated)
//! POST /cart/increase          - Add one unit from the cart panel
//! POST /cart/decrease          - Remove one unit (line removed at quantity 1)
//! POST /cart/remove            - Remove a line entirely
//!
//! # Checkout
//! GET  /checkout               - Order summary + payment form
//! GET  /checkout/summary       - Order summary fragment
//! POST /checkout               - Validate, charge, settle the cart
//! ```

pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Toast notification display data.
///
/// The notification sink is fire-and-forget: fragments are swapped
/// out-of-band into the page's `#toasts` region and nothing reads a result.
#[derive(Clone)]
pub struct ToastView {
    pub title: String,
    pub description: String,
    pub destructive: bool,
}

impl ToastView {
    /// A default-variant toast.
    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            destructive: false,
        }
    }

    /// A destructive-variant toast.
    #[must_use]
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            destructive: true,
        }
    }
}

/// Standalone toast fragment (HTMX out-of-band swap into `#toasts`).
#[derive(Template, WebTemplate)]
#[template(path = "partials/toast.html")]
pub struct ToastTemplate {
    pub toast: ToastView,
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/grid", get(products::grid))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/panel", get(cart::panel))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/increase", post(cart::increase))
        .route("/decrease", post(cart::decrease))
        .route("/remove", post(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::submit))
        .route("/summary", get(checkout::summary))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout routes
        .nest("/checkout", checkout_routes())
}
