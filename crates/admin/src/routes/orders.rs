//! Order route handlers.
//!
//! Status changes are checked against the order's current status before the
//! backend is asked to apply them.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use luxe_core::{Order, OrderId, OrderStatus};
use serde::Deserialize;
use tracing::instrument;

use super::or_empty;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(index))
        .route("/orders/{id}", get(show))
        .route("/orders/{id}/status", post(update_status))
}

/// Status change request body.
#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: OrderStatus,
}

/// GET /orders
#[instrument(skip_all)]
async fn index(_admin: RequireAdmin, State(state): State<AppState>) -> Json<Vec<Order>> {
    Json(or_empty("orders", state.backend().list_orders().await))
}

/// GET /orders/{id}
#[instrument(skip(_admin, state))]
async fn show(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    Ok(Json(state.backend().get_order(id).await?))
}

/// POST /orders/{id}/status
#[instrument(skip(_admin, state))]
async fn update_status(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(change): Json<StatusChange>,
) -> Result<Json<Order>> {
    let order = state.backend().get_order(id).await?;
    check_transition(order.status, change.status)?;

    let updated = state
        .backend()
        .update_order_status(id, change.status)
        .await?;
    tracing::info!(order_id = %id, from = %order.status, to = %change.status, "Order status changed");
    Ok(Json(updated))
}

fn check_transition(from: OrderStatus, to: OrderStatus) -> Result<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(AppError::InvalidTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_transition() {
        assert!(check_transition(OrderStatus::Pending, OrderStatus::Confirmed).is_ok());
        assert!(matches!(
            check_transition(OrderStatus::Delivered, OrderStatus::Shipped),
            Err(AppError::InvalidTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Shipped
            })
        ));
        assert!(check_transition(OrderStatus::Cancelled, OrderStatus::Cancelled).is_err());
    }
}
