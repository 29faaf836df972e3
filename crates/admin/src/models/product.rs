//! Product form submitted by the admin panel.

use luxe_core::checkout::required;
use luxe_core::product::DEFAULT_BRAND;
use luxe_core::{ProductStatus, ValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw product form values, as typed by the admin.
///
/// Numeric fields arrive as text so that validation can name the field that
/// failed to parse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub discount_price: String,
    #[serde(default)]
    pub stock_quantity: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub status: ProductStatus,
    /// Comma separated size options.
    #[serde(default)]
    pub sizes: String,
    /// Comma separated color options.
    #[serde(default)]
    pub colors: String,
    /// Comma separated tags.
    #[serde(default)]
    pub tags: String,
}

/// Body of `POST /products/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub stock_quantity: u32,
    pub is_in_stock: bool,
    pub is_active: bool,
    pub featured: bool,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub tags: Vec<String>,
}

/// Split a comma separated option list, dropping blanks.
#[must_use]
pub fn split_options(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_price(field: &'static str, raw: &str) -> Result<Decimal, ValidationError> {
    let price = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|_| ValidationError::invalid(field, "must be a number"))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::invalid(field, "cannot be negative"));
    }
    Ok(price)
}

impl ProductDraft {
    /// Validate the form into a backend payload.
    ///
    /// Checks run in form order: name, category, price, discount price,
    /// stock quantity.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(&self) -> Result<NewProduct, ValidationError> {
        let name = required("name", &self.name)?;
        let category = required("category", &self.category)?;
        let price = parse_price("price", &required("price", &self.price)?)?;

        let discount_price = match self.discount_price.trim() {
            "" => None,
            raw => {
                let discount = parse_price("discount_price", raw)?;
                if discount >= price {
                    return Err(ValidationError::invalid(
                        "discount_price",
                        "must be below the price",
                    ));
                }
                Some(discount)
            }
        };

        let stock_quantity = match self.stock_quantity.trim() {
            "" => 0,
            raw => raw.parse::<u32>().map_err(|_| {
                ValidationError::invalid("stock_quantity", "must be a whole number of at least 0")
            })?,
        };

        let brand = match self.brand.trim() {
            "" => DEFAULT_BRAND.to_string(),
            brand => brand.to_string(),
        };

        Ok(NewProduct {
            name,
            brand,
            category,
            description: self.description.trim().to_string(),
            price,
            discount_price,
            stock_quantity,
            is_in_stock: stock_quantity > 0,
            is_active: self.status.is_active(),
            featured: self.featured,
            sizes: split_options(&self.sizes),
            colors: split_options(&self.colors),
            tags: split_options(&self.tags),
        })
    }
}
