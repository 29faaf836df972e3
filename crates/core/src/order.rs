//! Orders as stored by the backend, and the payload for placing one.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::checkout::{OrderSummary, ShippingDetails};
use crate::types::{CustomerId, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId};

/// A line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default)]
    pub id: Option<OrderItemId>,
    pub product: ProductId,
    #[serde(default)]
    pub product_name: String,
    pub quantity: u32,
    /// Unit price at the time of the order.
    pub price: Decimal,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
}

impl OrderItem {
    /// Line total, as reported by the backend or computed from price and quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.total_price
            .unwrap_or_else(|| self.price * Decimal::from(self.quantity))
    }
}

/// An order as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub order_number: String,
    #[serde(default)]
    pub customer: Option<CustomerId>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub total_amount: Decimal,
    #[serde(default)]
    pub shipping_cost: Decimal,
    #[serde(default)]
    pub tax_amount: Decimal,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub shipping_city: String,
    #[serde(default)]
    pub shipping_state: Option<String>,
    #[serde(default)]
    pub shipping_zip_code: Option<String>,
    #[serde(default)]
    pub shipping_country: String,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Total number of units across all items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Whether the order counts towards revenue.
    #[must_use]
    pub fn counts_as_revenue(&self) -> bool {
        self.status != OrderStatus::Cancelled
    }
}

/// A line of a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub product: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub price: Decimal,
    pub size: String,
    pub color: String,
}

/// Payload for `POST /orders/` after a verified payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_email: String,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub customer_phone: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_reference: String,
    pub transaction_id: String,
    pub total_amount: Decimal,
    pub shipping_cost: Decimal,
    pub tax_amount: Decimal,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_state: Option<String>,
    pub shipping_zip_code: Option<String>,
    pub shipping_country: String,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    /// Assemble a paid order from the checkout details and the cart.
    #[must_use]
    pub fn paid(
        details: &ShippingDetails,
        cart: &Cart,
        summary: &OrderSummary,
        payment_reference: impl Into<String>,
        transaction_id: impl Into<String>,
    ) -> Self {
        let items = cart
            .lines()
            .iter()
            .map(|line| NewOrderItem {
                product: line.product.id,
                product_name: line.product.name.clone(),
                quantity: line.quantity,
                price: line.product.price,
                size: line.size.clone(),
                color: line.color.clone(),
            })
            .collect();

        Self {
            customer_email: details.email.as_str().to_string(),
            customer_first_name: details.first_name.clone(),
            customer_last_name: details.last_name.clone(),
            customer_phone: details.phone.clone(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Paid,
            payment_reference: payment_reference.into(),
            transaction_id: transaction_id.into(),
            total_amount: summary.total,
            shipping_cost: summary.shipping,
            tax_amount: summary.tax,
            shipping_address: details.address.clone(),
            shipping_city: details.city.clone(),
            shipping_state: details.state.clone(),
            shipping_zip_code: details.zip_code.clone(),
            shipping_country: details.country.clone(),
            items,
        }
    }
}

/// The backend's reply to an order placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAck {
    pub id: OrderId,
    #[serde(default)]
    pub order_number: String,
}
