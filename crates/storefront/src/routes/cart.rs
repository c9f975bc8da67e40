//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the session; every handler loads it, applies a
//! single cart operation, and saves it back. Mutations answer with an
//! `HX-Trigger: cart-updated` header so the count badge and cart panel
//! refresh themselves.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{AppendHeaders, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use veggie_go_core::{Cart, Catalog, ProductId, name_matches};

use crate::error::{AppError, Result};
use crate::models::session::keys;
use crate::routes::products::{SearchQuery, format_price};
use crate::routes::{ToastTemplate, ToastView};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: i32,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
}

/// Cart panel display data for templates.
#[derive(Clone)]
pub struct CartPanelView {
    /// Lines matching the live query, in product id order.
    pub lines: Vec<CartLineView>,
    /// Subtotal over the full cart, not just the visible lines.
    pub subtotal: String,
    /// Unit count over the full cart.
    pub total_items: u32,
    /// Whether the underlying cart holds no lines at all.
    pub is_empty: bool,
}

impl CartPanelView {
    /// Build the panel view: lines narrowed by the live query (the same
    /// predicate the product grid uses), totals computed over the full cart.
    ///
    /// A line whose product is missing from the catalog is skipped.
    #[must_use]
    pub fn build(cart: &Cart, catalog: &Catalog, query: &str) -> Self {
        let lines = cart
            .lines()
            .filter_map(|(id, quantity)| {
                let product = catalog.get(id)?;
                name_matches(&product.name, query).then(|| CartLineView {
                    id: id.as_i32(),
                    name: product.name.clone(),
                    quantity,
                    unit_price: format_price(product.price),
                    line_price: format_price(product.price * Decimal::from(quantity)),
                })
            })
            .collect();

        Self {
            lines,
            subtotal: format_price(cart.total_price(catalog)),
            total_items: cart.total_items(),
            is_empty: cart.is_empty(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session; a session without one has an empty cart.
pub async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Save the cart back to the session.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(keys::CART, cart).await?;
    Ok(())
}

/// Cart mutation form data.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub product_id: i32,
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub cart: CartPanelView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display the cart panel, narrowed by the shared search query (HTMX).
#[instrument(skip(state, session))]
pub async fn panel(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Result<Response> {
    let cart = load_cart(&session).await?;

    Ok(CartPanelTemplate {
        cart: CartPanelView::build(&cart, state.catalog(), &query.q),
    }
    .into_response())
}

/// Cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Response> {
    let cart = load_cart(&session).await?;

    Ok(CartCountTemplate {
        count: cart.total_items(),
    }
    .into_response())
}

/// Add one unit of a product to the cart (HTMX).
///
/// Answers with an "Added to cart" toast carrying the product's display
/// name, and triggers dependent fragments to refresh.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    let id = ProductId::new(form.product_id);
    let Some(product) = state.catalog().get(id) else {
        return Err(AppError::NotFound(format!("product {id}")));
    };

    let mut cart = load_cart(&session).await?;
    cart.add(id);
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        ToastTemplate {
            toast: ToastView::success("Added to cart", format!("{} is in your basket.", product.name)),
        },
    )
        .into_response())
}

/// Add one unit of a product from the cart panel (HTMX).
///
/// Same cart contract as `add`; invoked from a different affordance and
/// emits no toast.
#[instrument(skip(session))]
pub async fn increase(session: Session, Form(form): Form<CartItemForm>) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    cart.increase(ProductId::new(form.product_id));
    save_cart(&session, &cart).await?;

    Ok(cart_updated())
}

/// Remove one unit of a product; the line disappears at quantity 1 (HTMX).
#[instrument(skip(session))]
pub async fn decrease(session: Session, Form(form): Form<CartItemForm>) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    cart.decrease(ProductId::new(form.product_id));
    save_cart(&session, &cart).await?;

    Ok(cart_updated())
}

/// Remove a product's line entirely, regardless of quantity (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<CartItemForm>) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    cart.remove(ProductId::new(form.product_id));
    save_cart(&session, &cart).await?;

    Ok(cart_updated())
}

/// Empty-bodied response that tells listening fragments to refresh.
fn cart_updated() -> Response {
    (AppendHeaders([("HX-Trigger", "cart-updated")]), "").into_response()
}
