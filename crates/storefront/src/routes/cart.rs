//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Each handler loads it, applies one
//! mutation and stores it back, then answers with the refreshed cart.

use axum::{Json, extract::State};
use luxe_core::{AddOutcome, Cart, CartLine, LineKey, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{load_or_default, save};
use crate::models::session_keys;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub brand: String,
    pub image: Option<String>,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id,
            name: line.product.name.clone(),
            brand: line.product.brand.clone(),
            image: line.product.primary_image().map(str::to_string),
            size: line.size.clone(),
            color: line.color.clone(),
            quantity: line.quantity,
            unit_price: line.product.price,
            line_total: line.line_total(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u64,
    pub subtotal: Decimal,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            item_count: cart.total_item_count(),
            subtotal: cart.total_price(),
        }
    }
}

/// Toast-style message describing what an add did.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

/// Reply to an add: what happened plus the refreshed cart.
#[derive(Debug, Serialize)]
pub struct AddResponse {
    #[serde(flatten)]
    pub outcome: AddOutcome,
    pub notice: Notice,
    pub cart: CartView,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Update quantity form data. A quantity of zero or less removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
    pub quantity: i64,
}

/// Remove form data.
///
/// With size and color, removes that one variant; with neither, removes every
/// line for the product.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(load_or_default(session, session_keys::CART).await?)
}

async fn store_cart(session: &Session, cart: &Cart) -> Result<()> {
    Ok(save(session, session_keys::CART, cart).await?)
}

/// Show the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add a product variant to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<AddResponse>> {
    let product = state
        .catalog()
        .get(form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    if !product.sizes.is_empty() && !product.offers_size(&form.size) {
        return Err(AppError::BadRequest(format!(
            "size {} is not offered for {}",
            form.size, product.name
        )));
    }
    if !product.colors.is_empty() && !product.offers_color(&form.color) {
        return Err(AppError::BadRequest(format!(
            "color {} is not offered for {}",
            form.color, product.name
        )));
    }

    let mut cart = load_cart(&session).await?;
    let name = product.name.clone();
    let outcome = cart.add_line(product, form.size.as_str(), form.color.as_str(), form.quantity)?;
    store_cart(&session, &cart).await?;

    let notice = match outcome {
        AddOutcome::Added { .. } => Notice {
            title: "Added to cart".to_string(),
            description: format!("{name} ({}, {}) added to your cart", form.size, form.color),
        },
        AddOutcome::Updated { quantity } => Notice {
            title: "Item updated in cart".to_string(),
            description: format!("{name} quantity updated to {quantity}"),
        },
    };

    add_breadcrumb(
        "cart",
        "Added to cart",
        &[("product_id", form.product_id.to_string())],
    );

    Ok(Json(AddResponse {
        outcome,
        notice,
        cart: CartView::from(&cart),
    }))
}

/// Set a line's quantity.
#[instrument(skip(session))]
pub async fn update(session: Session, Json(form): Json<UpdateCartForm>) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.set_quantity(
        &LineKey::new(form.product_id, form.size, form.color),
        form.quantity,
    )?;
    store_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Remove one variant, or every line for a product.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(form): Json<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    match (form.size, form.color) {
        (Some(size), Some(color)) => {
            let key = LineKey::new(form.product_id, size, color);
            if !cart.remove_line(&key) {
                return Err(luxe_core::CartError::LineNotFound(key).into());
            }
        }
        (None, None) => {
            cart.remove_product(form.product_id);
        }
        _ => {
            return Err(AppError::BadRequest(
                "size and color must be given together".to_string(),
            ));
        }
    }
    store_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    store_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}
