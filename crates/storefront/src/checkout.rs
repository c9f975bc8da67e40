//! Checkout adapter.
//!
//! Validates the payment form, forwards the cart total to the payment
//! service, and settles the cart on the outcome: an approved payment clears
//! the cart, every other path leaves it untouched.

use serde::Deserialize;
use tracing::instrument;
use veggie_go_core::{Cart, Catalog};

use crate::services::payment::{PaymentClient, PaymentRequest};

/// Minimum accepted card number length.
pub const MIN_CARD_NUMBER_LEN: usize = 16;
/// Minimum accepted expiry length (`MM/YY`).
pub const MIN_EXPIRY_LEN: usize = 5;
/// Minimum accepted CVV length.
pub const MIN_CVV_LEN: usize = 3;

/// Payment form fields as submitted by the checkout page.
///
/// No `Debug` derive: card data must not end up in logs.
#[derive(Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub cvv: String,
}

/// Field-level validation messages for the payment form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub card_number: Option<&'static str>,
    pub expiry_date: Option<&'static str>,
    pub cvv: Option<&'static str>,
}

impl FieldErrors {
    /// Whether every field passed validation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.card_number.is_none() && self.expiry_date.is_none() && self.cvv.is_none()
    }
}

/// Validate the payment form.
///
/// Any failure aborts checkout before the payment service is called.
#[must_use]
pub fn validate(form: &CheckoutForm) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if form.card_number.trim().len() < MIN_CARD_NUMBER_LEN {
        errors.card_number = Some("Card number must be at least 16 digits");
    }
    if form.expiry_date.trim().len() < MIN_EXPIRY_LEN {
        errors.expiry_date = Some("Expiry date must be in MM/YY format");
    }
    if form.cvv.trim().len() < MIN_CVV_LEN {
        errors.cvv = Some("CVV must be at least 3 digits");
    }

    errors
}

/// Outcome of a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Validation failed; the payment service was never called.
    Invalid(FieldErrors),
    /// Nothing to charge; the payment service was never called.
    EmptyCart,
    /// Payment accepted; the cart has been cleared.
    Approved { message: String },
    /// Payment declined; the cart is unchanged.
    Declined { message: String },
    /// The payment call failed; the cart is unchanged.
    Errored,
}

/// Run a checkout attempt: validate, charge the cart total, settle.
///
/// Makes at most one payment service call, with no retry. Only the
/// `Approved` path mutates the cart.
#[instrument(skip_all)]
pub async fn process(
    form: &CheckoutForm,
    cart: &mut Cart,
    catalog: &Catalog,
    payment: &PaymentClient,
) -> CheckoutOutcome {
    let errors = validate(form);
    if !errors.is_empty() {
        return CheckoutOutcome::Invalid(errors);
    }

    if cart.is_empty() {
        return CheckoutOutcome::EmptyCart;
    }

    let request = PaymentRequest {
        card_number: form.card_number.trim().to_string(),
        expiry_date: form.expiry_date.trim().to_string(),
        cvv: form.cvv.trim().to_string(),
        amount: cart.total_price(catalog),
    };

    match payment.process(&request).await {
        Ok(result) => {
            let message = result.display_message().to_string();
            if result.success {
                cart.clear();
                CheckoutOutcome::Approved { message }
            } else {
                CheckoutOutcome::Declined { message }
            }
        }
        Err(e) => {
            tracing::error!("Payment service call failed: {e}");
            CheckoutOutcome::Errored
        }
    }
}
