//! Product grid route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use veggie_go_core::Product;

use crate::state::AppState;

/// The shared search query parameter.
///
/// One query value drives both the product grid and the cart panel.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
}

/// Format a decimal amount as a price string.
pub(crate) fn format_price(amount: Decimal) -> String {
    format!("${amount:.2}")
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: format_price(product.price),
            image_url: product.image_url.clone(),
        }
    }
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub products: Vec<ProductCardView>,
}

/// Product grid fragment, filtered by the live search query (HTMX).
#[instrument(skip(state))]
pub async fn grid(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let products = state
        .catalog()
        .search(&query.q)
        .into_iter()
        .map(ProductCardView::from)
        .collect();

    ProductGridTemplate { products }
}
