//! Catalog product as served by the backend.
//!
//! Products are immutable snapshots: the storefront replaces its whole list on
//! every refetch and never edits a product in place.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{ImageId, Price, ProductId};

/// Brand shown when the backend leaves it blank.
pub const DEFAULT_BRAND: &str = "LUXE";

/// A product image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    #[serde(default)]
    pub id: Option<ImageId>,
    /// Image URL (absolute, or relative to the backend origin).
    pub image: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default = "default_brand", deserialize_with = "brand_or_default")]
    pub brand: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub category: String,
    /// Price in the source currency (USD).
    pub price: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sizes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub colors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock_quantity: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub featured: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Create an active product with no option lists, images or stock.
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        brand: impl Into<String>,
        category: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            brand: brand.into(),
            category: category.into(),
            price,
            description: String::new(),
            sizes: Vec::new(),
            colors: Vec::new(),
            stock_quantity: 0,
            is_active: true,
            featured: false,
            images: Vec::new(),
            created_at: None,
        }
    }

    /// Set the size options.
    #[must_use]
    pub fn with_sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sizes = sizes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the color options.
    #[must_use]
    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    /// Add an image URL. The first image added becomes the primary one.
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        let is_primary = self.images.is_empty();
        self.images.push(ProductImage {
            id: None,
            image: url.into(),
            is_primary,
        });
        self
    }

    /// Set the stock quantity.
    #[must_use]
    pub const fn with_stock(mut self, stock_quantity: u32) -> Self {
        self.stock_quantity = stock_quantity;
        self
    }

    /// The product price as a USD [`Price`].
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::usd(self.price)
    }

    /// The image flagged primary, falling back to the first image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .iter()
            .find(|img| img.is_primary)
            .or_else(|| self.images.first())
            .map(|img| img.image.as_str())
    }

    /// Whether the backend reports stock on hand.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Whether `size` is one of the product's size options.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    /// Whether `color` is one of the product's color options.
    #[must_use]
    pub fn offers_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }
}

fn default_brand() -> String {
    DEFAULT_BRAND.to_string()
}

const fn default_true() -> bool {
    true
}

fn brand_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let brand = Option::<String>::deserialize(deserializer)?;
    Ok(brand
        .filter(|b| !b.trim().is_empty())
        .unwrap_or_else(default_brand))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Categories arrive as names from the public API and as numeric keys from
/// some admin endpoints; both are kept as text.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_product() {
        let json = r#"{
            "id": 12,
            "name": "Essential White Tee",
            "brand": "",
            "category": "shirts",
            "price": "70.00",
            "sizes": null,
            "colors": ["white", "black"],
            "stock_quantity": 4,
            "is_active": true,
            "images": [
                {"id": 1, "image": "/media/a.jpg", "is_primary": false},
                {"id": 2, "image": "/media/b.jpg", "is_primary": true}
            ],
            "created_at": "2025-01-02T03:04:05Z"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(12));
        assert_eq!(product.brand, DEFAULT_BRAND);
        assert_eq!(product.price, "70".parse::<Decimal>().unwrap());
        assert!(product.sizes.is_empty());
        assert!(product.offers_color("black"));
        assert_eq!(product.primary_image(), Some("/media/b.jpg"));
        assert!(product.in_stock());
        assert!(product.created_at.is_some());
    }

    #[test]
    fn test_deserialize_minimal_product() {
        let product: Product =
            serde_json::from_str(r#"{"id": 1, "name": "Cap", "price": 100, "category": 3}"#)
                .unwrap();
        assert_eq!(product.category, "3");
        assert!(product.is_active);
        assert!(!product.in_stock());
        assert_eq!(product.primary_image(), None);
    }

    #[test]
    fn test_primary_image_falls_back_to_first() {
        let product = Product::new(ProductId::new(1), "Tee", "LUXE", "shirts", Decimal::ONE)
            .with_image("/a.jpg")
            .with_image("/b.jpg");
        assert_eq!(product.primary_image(), Some("/a.jpg"));
    }
}
