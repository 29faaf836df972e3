//! Shopping cart store.
//!
//! A cart is an ordered list of [`CartLine`]s. Each line is identified by its
//! [`LineKey`] (product id, chosen size, chosen color) and the cart never
//! holds two lines with the same key: adding to an existing key merges the
//! quantities. All mutations address a single variant through its full key;
//! [`Cart::remove_product`] is the only operation that spans variants.
//!
//! Totals are recomputed from the lines on every call, so they cannot drift
//! from the line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{Price, ProductId};

/// Errors returned by cart mutations. A failed mutation leaves the cart
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    /// Quantities added to the cart must be positive.
    #[error("quantity must be a positive integer")]
    ZeroQuantity,
    /// No line matches the given key.
    #[error("no cart line for product {0}")]
    LineNotFound(LineKey),
}

/// Uniqueness key of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
}

impl LineKey {
    #[must_use]
    pub fn new(product_id: ProductId, size: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            product_id,
            size: size.into(),
            color: color.into(),
        }
    }
}

impl std::fmt::Display for LineKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self.product_id, self.size, self.color)
    }
}

/// A product in the cart with the shopper's chosen options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub size: String,
    pub color: String,
    pub quantity: u32,
}

impl CartLine {
    /// The line's uniqueness key.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product.id, self.size.clone(), self.color.clone())
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product.id == key.product_id && self.size == key.size && self.color == key.color
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// What [`Cart::add_line`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AddOutcome {
    /// A new line was appended.
    Added { quantity: u32 },
    /// An existing line's quantity was increased to `quantity`.
    Updated { quantity: u32 },
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` units of a product variant.
    ///
    /// Merges into the existing line when the (product, size, color) key is
    /// already present; appends a new line otherwise. Stock is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if `quantity` is zero.
    pub fn add_line(
        &mut self,
        product: Product,
        size: impl Into<String>,
        color: impl Into<String>,
        quantity: u32,
    ) -> Result<AddOutcome, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let key = LineKey::new(product.id, size, color);
        if let Some(line) = self.lines.iter_mut().find(|line| line.matches(&key)) {
            line.quantity = line.quantity.saturating_add(quantity);
            return Ok(AddOutcome::Updated {
                quantity: line.quantity,
            });
        }

        self.lines.push(CartLine {
            product,
            size: key.size,
            color: key.color,
            quantity,
        });
        Ok(AddOutcome::Added { quantity })
    }

    /// Remove the line with this key. Returns whether a line was removed.
    pub fn remove_line(&mut self, key: &LineKey) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| !line.matches(key));
        self.lines.len() != before
    }

    /// Remove every variant of a product. Returns the number of lines removed.
    pub fn remove_product(&mut self, product_id: ProductId) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| line.product.id != product_id);
        before - self.lines.len()
    }

    /// Set the quantity of one line. A quantity of zero or less removes it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if no line has this key.
    pub fn set_quantity(&mut self, key: &LineKey, quantity: i64) -> Result<(), CartError> {
        let Some(position) = self.lines.iter().position(|line| line.matches(key)) else {
            return Err(CartError::LineNotFound(key.clone()));
        };

        if quantity <= 0 {
            self.lines.remove(position);
            return Ok(());
        }

        if let Some(line) = self.lines.get_mut(position) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        Ok(())
    }

    /// Take the quantities in `ordered` out of this cart.
    ///
    /// Lines added after `ordered` was taken, and quantity raised since, stay
    /// in the cart.
    pub fn remove_ordered(&mut self, ordered: &Self) {
        for placed in &ordered.lines {
            let key = placed.key();
            if let Some(line) = self.lines.iter_mut().find(|line| line.matches(&key)) {
                line.quantity = line.quantity.saturating_sub(placed.quantity);
            }
        }
        self.lines.retain(|line| line.quantity > 0);
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of price × quantity across all lines, in the source currency.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// [`Self::total_price`] as a USD [`Price`].
    #[must_use]
    pub fn subtotal(&self) -> Price {
        Price::usd(self.total_price())
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Find the line with this key.
    #[must_use]
    pub fn line(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.matches(key))
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
