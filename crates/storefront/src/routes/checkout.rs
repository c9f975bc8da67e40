//! Checkout route handlers.
//!
//! The checkout page shows an order summary and the payment form. Submission
//! runs the checkout adapter; the response swaps the form back in (with
//! field errors when validation failed) and raises an out-of-band toast for
//! the outcome. A per-session guard keeps a second submission from being
//! issued while a payment call is in flight.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use rust_decimal::Decimal;
use tower_sessions::Session;
use tracing::instrument;

use veggie_go_core::{Cart, Catalog};

use crate::checkout::{CheckoutForm, CheckoutOutcome, FieldErrors, process};
use crate::error::Result;
use crate::filters;
use crate::routes::cart::{CartLineView, load_cart, save_cart};
use crate::routes::products::format_price;
use crate::routes::ToastView;
use crate::state::AppState;

/// Order summary display data for templates.
#[derive(Clone)]
pub struct CheckoutSummaryView {
    pub lines: Vec<CartLineView>,
    pub total: Decimal,
    pub is_empty: bool,
}

impl CheckoutSummaryView {
    /// Build the summary over the full cart (the summary is never filtered).
    #[must_use]
    pub fn build(cart_state: &Cart, catalog: &Catalog) -> Self {
        let lines = cart_state
            .lines()
            .filter_map(|(id, quantity)| {
                let product = catalog.get(id)?;
                Some(CartLineView {
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
            total: cart_state.total_price(catalog),
            is_empty: cart_state.is_empty(),
        }
    }
}

/// Payment form display data: submitted values plus field-level errors.
#[derive(Clone, Default)]
pub struct CheckoutFormView {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub errors: FieldErrors,
}

impl CheckoutFormView {
    fn from_submission(form: &CheckoutForm, errors: FieldErrors) -> Self {
        Self {
            card_number: form.card_number.clone(),
            expiry_date: form.expiry_date.clone(),
            cvv: form.cvv.clone(),
            errors,
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutPageTemplate {
    pub summary: CheckoutSummaryView,
    pub form: CheckoutFormView,
}

/// Order summary fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_summary.html")]
pub struct CheckoutSummaryTemplate {
    pub summary: CheckoutSummaryView,
}

/// Checkout submission response: the form plus an optional outcome toast.
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_result.html")]
pub struct CheckoutResultTemplate {
    pub form: CheckoutFormView,
    pub toast: Option<ToastView>,
}

/// Display the checkout page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let cart_state = load_cart(&session).await?;

    Ok(CheckoutPageTemplate {
        summary: CheckoutSummaryView::build(&cart_state, state.catalog()),
        form: CheckoutFormView::default(),
    })
}

/// Order summary fragment (HTMX). Refreshes after the cart changes.
#[instrument(skip(state, session))]
pub async fn summary(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart_state = load_cart(&session).await?;

    Ok(CheckoutSummaryTemplate {
        summary: CheckoutSummaryView::build(&cart_state, state.catalog()),
    }
    .into_response())
}

/// Submit the payment form (HTMX).
///
/// Runs the checkout adapter and renders the outcome. The cart is saved
/// back before the per-session permit is released, so a follow-up checkout
/// always sees the settled cart.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let mut cart_state = load_cart(&session).await?;

    // Serialize checkout per session: one in-flight payment call at a time.
    // A session without an id has never stored a cart, so there is nothing
    // to guard and the empty-cart path answers below.
    let permit = match session.id() {
        Some(id) => match state.checkout_guard().try_begin(id) {
            Some(permit) => Some(permit),
            None => {
                return Ok(CheckoutResultTemplate {
                    form: CheckoutFormView::from_submission(&form, FieldErrors::default()),
                    toast: Some(ToastView::destructive(
                        "Checkout in progress",
                        "Your payment is still being processed.",
                    )),
                }
                .into_response());
            }
        },
        None => None,
    };

    let outcome = process(&form, &mut cart_state, state.catalog(), state.payment()).await;
    save_cart(&session, &cart_state).await?;
    drop(permit);

    let response = match outcome {
        CheckoutOutcome::Invalid(errors) => CheckoutResultTemplate {
            form: CheckoutFormView::from_submission(&form, errors),
            toast: None,
        },
        CheckoutOutcome::EmptyCart => CheckoutResultTemplate {
            form: CheckoutFormView::from_submission(&form, FieldErrors::default()),
            toast: Some(ToastView::destructive(
                "Your basket is empty",
                "Add some produce before checking out.",
            )),
        },
        CheckoutOutcome::Approved { message } => CheckoutResultTemplate {
            form: CheckoutFormView::default(),
            toast: Some(ToastView::success("Payment successful", message)),
        },
        CheckoutOutcome::Declined { message } => CheckoutResultTemplate {
            form: CheckoutFormView::from_submission(&form, FieldErrors::default()),
            toast: Some(ToastView::destructive("Payment declined", message)),
        },
        CheckoutOutcome::Errored => CheckoutResultTemplate {
            form: CheckoutFormView::from_submission(&form, FieldErrors::default()),
            toast: Some(ToastView::destructive(
                "Payment error",
                "Something went wrong processing your payment. Please try again.",
            )),
        },
    };

    Ok((AppendHeaders([("HX-Trigger", "cart-updated")]), response).into_response())
}
