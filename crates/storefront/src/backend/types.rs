//! Wire types for the store backend that have no counterpart in `luxe-core`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `POST /payments/verify/`.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyPaymentRequest<'a> {
    pub transaction_id: &'a str,
    pub tx_ref: &'a str,
}

/// The gateway's view of a transaction, relayed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentVerification {
    pub status: String,
    pub tx_ref: String,
    pub amount: Decimal,
    pub currency: String,
}

impl PaymentVerification {
    /// Whether the gateway reports the charge as settled.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.status.eq_ignore_ascii_case("successful")
    }
}
