//! Wire types for the admin side of the store backend.

use luxe_core::OrderStatus;
use serde::Serialize;

/// Body of `POST /orders/{id}/update_status/`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// An image file attached to a product upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
