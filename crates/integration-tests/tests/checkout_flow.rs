//! Checkout adapter flows against fixed payment clients.

use rust_decimal::Decimal;
use veggie_go_core::{Cart, ProductId};
use veggie_go_storefront::catalog;
use veggie_go_storefront::checkout::{CheckoutForm, CheckoutOutcome, process, validate};
use veggie_go_storefront::services::payment::{
    DEFAULT_DECLINED_MESSAGE, PaymentClient, PaymentResult,
};

fn valid_form() -> CheckoutForm {
    CheckoutForm {
        card_number: "4242424242424242".to_string(),
        expiry_date: "12/30".to_string(),
        cvv: "123".to_string(),
    }
}

fn loaded_cart() -> Cart {
    let mut cart = Cart::new();
    cart.add(ProductId::new(1)); // Tomato, 2.50
    cart.add(ProductId::new(1));
    cart.add(ProductId::new(3)); // Spinach, 3.00
    cart
}

#[tokio::test]
async fn test_approved_checkout_empties_the_cart() {
    let catalog = catalog::load().expect("seed catalog is valid");
    let mut cart = loaded_cart();
    assert_eq!(cart.total_price(&catalog), Decimal::new(800, 2));

    let payment = PaymentClient::fixed(PaymentResult::approved());
    let outcome = process(&valid_form(), &mut cart, &catalog, &payment).await;

    match outcome {
        CheckoutOutcome::Approved { message } => {
            assert_eq!(message, "Payment processed successfully.");
        }
        other => panic!("expected approval, got {other:?}"),
    }
    assert!(cart.is_empty());
    assert_eq!(cart.total_items(), 0);
}

#[tokio::test]
async fn test_declined_checkout_keeps_the_cart_for_retry() {
    let catalog = catalog::load().expect("seed catalog is valid");
    let mut cart = loaded_cart();
    let before = cart.clone();

    let payment = PaymentClient::fixed(PaymentResult {
        success: false,
        message: String::new(),
    });
    let outcome = process(&valid_form(), &mut cart, &catalog, &payment).await;

    assert_eq!(
        outcome,
        CheckoutOutcome::Declined {
            message: DEFAULT_DECLINED_MESSAGE.to_string()
        }
    );
    assert_eq!(cart, before);

    // The user may retry immediately with the preserved cart.
    let retry = PaymentClient::fixed(PaymentResult::approved());
    let outcome = process(&valid_form(), &mut cart, &catalog, &retry).await;
    assert!(matches!(outcome, CheckoutOutcome::Approved { .. }));
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_short_card_number_never_reaches_the_payment_service() {
    let catalog = catalog::load().expect("seed catalog is valid");
    let mut cart = loaded_cart();
    let before = cart.clone();

    let form = CheckoutForm {
        card_number: "4242424242".to_string(), // 10 characters
        ..valid_form()
    };

    // The always-approve stub would clear the cart if it were consulted.
    let payment = PaymentClient::fixed(PaymentResult::approved());
    let outcome = process(&form, &mut cart, &catalog, &payment).await;

    let CheckoutOutcome::Invalid(errors) = outcome else {
        panic!("expected validation failure");
    };
    assert!(errors.card_number.is_some());
    assert!(errors.expiry_date.is_none());
    assert!(errors.cvv.is_none());
    assert_eq!(cart, before);
}

#[test]
fn test_validation_boundaries() {
    // Exactly at the minimums: accepted.
    assert!(validate(&valid_form()).is_empty());

    let form = CheckoutForm {
        card_number: "4".repeat(15),
        expiry_date: "1/30".to_string(),
        cvv: "12".to_string(),
    };
    let errors = validate(&form);
    assert!(errors.card_number.is_some());
    assert!(errors.expiry_date.is_some());
    assert!(errors.cvv.is_some());
}

#[tokio::test]
async fn test_empty_cart_checkout_is_rejected_without_a_charge() {
    let catalog = catalog::load().expect("seed catalog is valid");
    let mut cart = Cart::new();

    let payment = PaymentClient::fixed(PaymentResult::approved());
    let outcome = process(&valid_form(), &mut cart, &catalog, &payment).await;

    assert_eq!(outcome, CheckoutOutcome::EmptyCart);
}
