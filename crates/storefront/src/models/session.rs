//! Session-related types.
//!
//! Each visitor session owns one cart, one filter state and at most one
//! pending payment. Handlers load them, mutate, and store them back.

use chrono::{DateTime, Utc};
use luxe_core::{Cart, CurrencyCode, OrderSummary, ShippingDetails};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A payment handed to the hosted widget and not yet confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPayment {
    /// Unique reference the widget echoes back on completion.
    pub tx_ref: String,
    /// Amount the gateway must report, in `currency`.
    pub amount: Decimal,
    pub currency: CurrencyCode,
    pub details: ShippingDetails,
    pub summary: OrderSummary,
    /// The cart as priced when the payment started.
    pub cart: Cart,
    pub created_at: DateTime<Utc>,
}

/// Session keys for storefront state.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";

    /// Key for the visitor's catalog filters.
    pub const FILTERS: &str = "filters";

    /// Key for the payment awaiting confirmation.
    pub const PENDING_PAYMENT: &str = "pending_payment";
}
