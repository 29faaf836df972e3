//! Checkout through the hosted payment widget.
//!
//! # Flow
//!
//! 1. [`begin`] validates the contact form, prices the cart and records a
//!    [`PendingPayment`] with a fresh transaction reference. The caller stores
//!    it in the session and hands [`PaymentRequest`] to the browser widget.
//! 2. The widget charges the shopper and reports a transaction id.
//! 3. [`confirm`] asks the backend to verify the transaction, then places the
//!    order. The caller then removes the ordered lines from the cart.

use chrono::{DateTime, Utc};
use luxe_core::{
    Cart, CheckoutForm, CurrencyCode, NewOrder, OrderAck, OrderSummary, ShippingMethod,
    ValidationError,
};
use rand::Rng;
use rand::distr::Alphanumeric;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use crate::backend::{BackendClient, BackendError, PaymentVerification};
use crate::config::PaymentConfig;
use crate::models::PendingPayment;

/// Length of the random suffix of a transaction reference.
const TX_REF_SUFFIX_LEN: usize = 10;

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no payment is awaiting confirmation")]
    NoPendingPayment,

    #[error("transaction reference does not match the pending payment")]
    ReferenceMismatch,

    #[error("payment was not successful (status: {0})")]
    PaymentNotSuccessful(String),

    #[error("payment currency {actual} does not match {expected}")]
    CurrencyMismatch { expected: CurrencyCode, actual: String },

    #[error("payment amount {actual} is below the order total {expected}")]
    AmountTooLow { expected: Decimal, actual: Decimal },

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Shopper details the widget pre-fills.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetCustomer {
    pub email: String,
    pub name: String,
    pub phone_number: String,
}

/// Everything the browser needs to open the payment widget.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    pub public_key: Option<String>,
    pub tx_ref: String,
    pub amount: Decimal,
    pub currency: CurrencyCode,
    pub customer: WidgetCustomer,
    pub summary: OrderSummary,
}

/// Generate a transaction reference: `LUXE-<unix seconds>-<10 alphanumerics>`.
#[must_use]
pub fn generate_tx_ref(now: DateTime<Utc>) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TX_REF_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("LUXE-{}-{suffix}", now.timestamp())
}

/// Price the cart for a shipping method using the backend's settings.
pub async fn quote(client: &BackendClient, cart: &Cart, method: ShippingMethod) -> OrderSummary {
    let settings = client.checkout_settings().await;
    OrderSummary::compute(cart.total_price(), method, &settings)
}

/// Start a payment for the cart.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] for an empty cart and
/// [`CheckoutError::Validation`] naming the first invalid form field.
#[instrument(skip_all)]
pub async fn begin(
    client: &BackendClient,
    payment: &PaymentConfig,
    cart: &Cart,
    form: &CheckoutForm,
) -> Result<(PendingPayment, PaymentRequest), CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let details = form.validate()?;

    let summary = quote(client, cart, details.shipping_method).await;
    let charge = summary.charge_in(payment.currency);
    let now = Utc::now();
    let tx_ref = generate_tx_ref(now);

    let request = PaymentRequest {
        public_key: payment.public_key.clone(),
        tx_ref: tx_ref.clone(),
        amount: charge.amount,
        currency: charge.currency_code,
        customer: WidgetCustomer {
            email: details.email.as_str().to_string(),
            name: details.full_name(),
            phone_number: details.phone.clone(),
        },
        summary,
    };

    tracing::info!(
        tx_ref = %tx_ref,
        amount = %charge.amount,
        currency = %charge.currency_code,
        "Payment started"
    );

    let pending = PendingPayment {
        tx_ref,
        amount: charge.amount,
        currency: charge.currency_code,
        details,
        summary,
        cart: cart.clone(),
        created_at: now,
    };
    Ok((pending, request))
}

/// Check a gateway verification against the pending payment.
///
/// # Errors
///
/// Returns an error unless the status is successful and the reference,
/// currency and amount (at least the expected total) all match.
pub fn check_verification(
    pending: &PendingPayment,
    verification: &PaymentVerification,
) -> Result<(), CheckoutError> {
    if !verification.is_successful() {
        return Err(CheckoutError::PaymentNotSuccessful(
            verification.status.clone(),
        ));
    }
    if verification.tx_ref != pending.tx_ref {
        return Err(CheckoutError::ReferenceMismatch);
    }
    if !verification
        .currency
        .eq_ignore_ascii_case(pending.currency.code())
    {
        return Err(CheckoutError::CurrencyMismatch {
            expected: pending.currency,
            actual: verification.currency.clone(),
        });
    }
    if verification.amount < pending.amount {
        return Err(CheckoutError::AmountTooLow {
            expected: pending.amount,
            actual: verification.amount,
        });
    }
    Ok(())
}

/// Verify the payment with the backend and place the order.
///
/// # Errors
///
/// Returns an error if the reference does not match, verification fails or
/// the backend does not acknowledge the order. Nothing is placed in that case.
#[instrument(skip_all, fields(tx_ref = %pending.tx_ref))]
pub async fn confirm(
    client: &BackendClient,
    pending: &PendingPayment,
    transaction_id: &str,
    tx_ref: &str,
) -> Result<OrderAck, CheckoutError> {
    if tx_ref != pending.tx_ref {
        return Err(CheckoutError::ReferenceMismatch);
    }

    let verification = client.verify_payment(transaction_id, tx_ref).await?;
    if let Err(e) = check_verification(pending, &verification) {
        tracing::warn!(error = %e, "Payment verification rejected");
        return Err(e);
    }

    let order = NewOrder::paid(
        &pending.details,
        &pending.cart,
        &pending.summary,
        &pending.tx_ref,
        transaction_id,
    );
    let ack = client.create_order(&order).await?;
    tracing::info!(order_id = %ack.id, "Order placed");
    Ok(ack)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use luxe_core::{CheckoutSettings, Product, ProductId};

    fn pending() -> PendingPayment {
        let mut cart = Cart::default();
        cart.add_line(
            Product::new(ProductId::new(1), "Tee", "LUXE", "shirts", Decimal::from(20)),
            "M",
            "black",
            1,
        )
        .unwrap();
        let details = CheckoutForm {
            first_name: "Ada".to_string(),
            last_name: "Okello".to_string(),
            email: "ada@example.com".to_string(),
            phone: "0700".to_string(),
            address: "Plot 4".to_string(),
            city: "Kampala".to_string(),
            country: "Uganda".to_string(),
            ..CheckoutForm::default()
        }
        .validate()
        .unwrap();
        let summary = OrderSummary::compute(
            cart.total_price(),
            ShippingMethod::Standard,
            &CheckoutSettings::default(),
        );
        PendingPayment {
            tx_ref: "LUXE-1700000000-abcdefghij".to_string(),
            amount: summary.total,
            currency: CurrencyCode::USD,
            details,
            summary,
            cart,
            created_at: Utc::now(),
        }
    }

    fn verification(status: &str, tx_ref: &str, amount: i64, currency: &str) -> PaymentVerification {
        PaymentVerification {
            status: status.to_string(),
            tx_ref: tx_ref.to_string(),
            amount: Decimal::from(amount),
            currency: currency.to_string(),
        }
    }

    #[test]
    fn test_tx_ref_format() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let tx_ref = generate_tx_ref(now);
        let suffix = tx_ref.strip_prefix("LUXE-1700000000-").unwrap();
        assert_eq!(suffix.len(), TX_REF_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(generate_tx_ref(now), tx_ref);
    }

    #[test]
    fn test_successful_verification() {
        let pending = pending();
        assert_eq!(pending.amount, Decimal::from(30));
        let ok = verification("successful", &pending.tx_ref, 30, "usd");
        assert!(check_verification(&pending, &ok).is_ok());

        let overpaid = verification("successful", &pending.tx_ref, 31, "USD");
        assert!(check_verification(&pending, &overpaid).is_ok());
    }

    #[test]
    fn test_verification_rejections() {
        let pending = pending();
        assert!(matches!(
            check_verification(&pending, &verification("failed", &pending.tx_ref, 30, "USD")),
            Err(CheckoutError::PaymentNotSuccessful(_))
        ));
        assert!(matches!(
            check_verification(&pending, &verification("successful", "LUXE-other", 30, "USD")),
            Err(CheckoutError::ReferenceMismatch)
        ));
        assert!(matches!(
            check_verification(&pending, &verification("successful", &pending.tx_ref, 30, "UGX")),
            Err(CheckoutError::CurrencyMismatch { .. })
        ));
        assert!(matches!(
            check_verification(&pending, &verification("successful", &pending.tx_ref, 29, "USD")),
            Err(CheckoutError::AmountTooLow { .. })
        ));
    }
}
