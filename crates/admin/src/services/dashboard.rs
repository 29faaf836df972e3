//! Dashboard statistics.
//!
//! Computed on every request from the backend's product, order and customer
//! lists; nothing is cached.

use std::collections::BTreeMap;

use luxe_core::{Customer, Order, OrderStatus, Product};
use rust_decimal::Decimal;
use serde::Serialize;

/// Number of orders listed under "recent".
pub const RECENT_ORDER_COUNT: usize = 5;

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_products: usize,
    pub active_products: usize,
    pub total_orders: usize,
    pub total_customers: usize,
    /// Sum of order totals, cancelled orders excluded.
    pub revenue: Decimal,
    /// Order count for every status, including zeros.
    pub orders_by_status: BTreeMap<&'static str, usize>,
    /// Newest orders first.
    pub recent_orders: Vec<Order>,
}

impl DashboardStats {
    /// Compute the statistics.
    #[must_use]
    pub fn compute(products: &[Product], orders: &[Order], customers: &[Customer]) -> Self {
        let mut orders_by_status: BTreeMap<&'static str, usize> =
            OrderStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect();
        for order in orders {
            *orders_by_status.entry(order.status.as_str()).or_default() += 1;
        }

        let revenue = orders
            .iter()
            .filter(|order| order.counts_as_revenue())
            .map(|order| order.total_amount)
            .sum();

        let mut recent_orders = orders.to_vec();
        // Undated orders sort last; ties fall back to the higher id
        recent_orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        recent_orders.truncate(RECENT_ORDER_COUNT);

        Self {
            total_products: products.len(),
            active_products: products.iter().filter(|p| p.is_active).count(),
            total_orders: orders.len(),
            total_customers: customers.len(),
            revenue,
            orders_by_status,
            recent_orders,
        }
    }
}
