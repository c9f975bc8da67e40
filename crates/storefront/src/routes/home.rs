//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::routes::cart::{CartPanelView, load_cart};
use crate::routes::products::{ProductCardView, SearchQuery};
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// The shared search query, echoed into the search input.
    pub query: String,
    /// Products matching the query, in catalog order.
    pub products: Vec<ProductCardView>,
    /// Cart panel, narrowed by the same query.
    pub cart: CartPanelView,
}

/// Display the home page: product grid plus cart panel, both derived from
/// the one shared search query.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;

    let products = state
        .catalog()
        .search(&query.q)
        .into_iter()
        .map(ProductCardView::from)
        .collect();

    Ok(HomeTemplate {
        cart: CartPanelView::build(&cart, state.catalog(), &query.q),
        products,
        query: query.q,
    })
}
