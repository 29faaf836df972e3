//! Checkout route handlers.
//!
//! `POST /checkout` starts a payment and remembers it in the session;
//! `POST /checkout/confirm` verifies it and places the order. The ordered lines
//! leave the cart only once the backend has acknowledged the order.

use axum::{
    Json,
    extract::{Query, State},
};
use luxe_core::{Cart, CheckoutForm, OrderAck, OrderSummary, ShippingMethod};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::{load_or_default, save};
use crate::models::{PendingPayment, session_keys};
use crate::services::checkout::{self, CheckoutError, PaymentRequest};
use crate::state::AppState;

/// Query for a price quote.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    #[serde(default, rename = "shipping", alias = "shipping_method")]
    pub shipping_method: ShippingMethod,
}

/// Confirmation posted by the browser after the payment widget closes.
#[derive(Debug, Deserialize)]
pub struct ConfirmForm {
    pub transaction_id: String,
    pub tx_ref: String,
}

/// Reply to a successful confirmation.
#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub order: OrderAck,
    pub message: String,
}

/// Price the session cart for a shipping method (`?shipping=express`).
#[instrument(skip(state, session))]
pub async fn summary(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<OrderSummary>> {
    let cart: Cart = load_or_default(&session, session_keys::CART).await?;
    let summary = checkout::quote(state.backend(), &cart, query.shipping_method).await;
    Ok(Json(summary))
}

/// Validate the form and start a payment for the session cart.
#[instrument(skip_all)]
pub async fn begin(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CheckoutForm>,
) -> Result<Json<PaymentRequest>> {
    let cart: Cart = load_or_default(&session, session_keys::CART).await?;
    let (pending, request) =
        checkout::begin(state.backend(), &state.config().payment, &cart, &form).await?;
    save(&session, session_keys::PENDING_PAYMENT, &pending).await?;

    add_breadcrumb(
        "checkout",
        "Payment started",
        &[("tx_ref", pending.tx_ref.clone())],
    );
    Ok(Json(request))
}

/// Verify the payment and place the order.
#[instrument(skip_all, fields(tx_ref = %form.tx_ref))]
pub async fn confirm(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<ConfirmForm>,
) -> Result<Json<ConfirmResponse>> {
    let pending: PendingPayment = session
        .get(session_keys::PENDING_PAYMENT)
        .await?
        .ok_or(CheckoutError::NoPendingPayment)?;

    let order = checkout::confirm(
        state.backend(),
        &pending,
        &form.transaction_id,
        &form.tx_ref,
    )
    .await?;

    let mut cart: Cart = load_or_default(&session, session_keys::CART).await?;
    cart.remove_ordered(&pending.cart);
    save(&session, session_keys::CART, &cart).await?;
    session
        .remove::<PendingPayment>(session_keys::PENDING_PAYMENT)
        .await?;

    add_breadcrumb(
        "checkout",
        "Order placed",
        &[("order_id", order.id.to_string())],
    );
    let reference = if order.order_number.is_empty() {
        order.id.to_string()
    } else {
        order.order_number.clone()
    };
    Ok(Json(ConfirmResponse {
        message: format!("Order {reference} placed"),
        order,
    }))
}
