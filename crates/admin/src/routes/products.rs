//! Product route handlers.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use luxe_core::{Product, ProductId, ProductStatus, ValidationError};
use tracing::instrument;

use super::or_empty;
use crate::backend::ImageUpload;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::ProductDraft;
use crate::state::AppState;

/// Upper bound for a multipart product upload, images included.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(index).post(create))
        .route(
            "/products/upload",
            post(upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/products/{id}", delete(destroy))
}

/// GET /products
#[instrument(skip_all)]
async fn index(_admin: RequireAdmin, State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(or_empty("products", state.backend().list_products().await))
}

/// POST /products
#[instrument(skip_all, fields(name = %draft.name))]
async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = draft.validate()?;
    let created = state.backend().create_product(&product).await?;
    tracing::info!(product_id = %created.id, "Product created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /products/upload
///
/// Text parts carry the same fields as the JSON form; every part named
/// `images` is forwarded as a file.
#[instrument(skip_all)]
async fn upload(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Product>)> {
    let (draft, images) = read_upload(multipart).await?;
    let product = draft.validate()?;
    let created = state
        .backend()
        .create_product_with_images(&product, images)
        .await?;
    tracing::info!(product_id = %created.id, "Product created with images");
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /products/{id}
#[instrument(skip(_admin, state))]
async fn destroy(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    state.backend().delete_product(id).await?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn read_upload(mut multipart: Multipart) -> Result<(ProductDraft, Vec<ImageUpload>)> {
    let mut draft = ProductDraft::default();
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "images" {
            let file_name = field.file_name().unwrap_or("image").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if !bytes.is_empty() {
                images.push(ImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        set_draft_field(&mut draft, &name, value)?;
    }

    Ok((draft, images))
}

fn set_draft_field(draft: &mut ProductDraft, name: &str, value: String) -> Result<()> {
    match name {
        "name" => draft.name = value,
        "brand" => draft.brand = value,
        "category" => draft.category = value,
        "description" => draft.description = value,
        "price" => draft.price = value,
        "discount_price" => draft.discount_price = value,
        "stock_quantity" => draft.stock_quantity = value,
        "sizes" => draft.sizes = value,
        "colors" => draft.colors = value,
        "tags" => draft.tags = value,
        "featured" => draft.featured = matches!(value.trim(), "true" | "on" | "1"),
        "status" => draft.status = parse_status(&value)?,
        other => tracing::debug!(field = other, "Ignoring unknown upload field"),
    }
    Ok(())
}

fn parse_status(raw: &str) -> Result<ProductStatus> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_lowercase()))
        .map_err(|_| ValidationError::invalid("status", "must be draft, published or hidden").into())
}
