//! Product filter and sort store.
//!
//! [`FilterState`] holds the shopper's browsing facets. Facets are
//! independent: changing one never resets another. The visible product list
//! is always derived from the current state and a flat product list by
//! [`FilterState::derived_list`], which has no side effects.
//!
//! Size and color selections are remembered for the product grid but do not
//! narrow the derived list.

use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Errors produced while changing filter state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("price range minimum {min} is above maximum {max}")]
    InvertedPriceRange { min: Decimal, max: Decimal },
    #[error("price range bounds cannot be negative")]
    NegativePrice,
    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),
    #[error("invalid price: {0}")]
    InvalidPrice(String),
}

/// Sort order of the derived list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    /// Highest product id first; ids are assigned in creation order.
    #[default]
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "price-low", alias = "price-ascending")]
    PriceAscending,
    #[serde(rename = "price-high", alias = "price-descending")]
    PriceDescending,
    #[serde(rename = "brand-az", alias = "brand-alphabetical")]
    BrandAlphabetical,
}

impl SortKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAscending => "price-low",
            Self::PriceDescending => "price-high",
            Self::BrandAlphabetical => "brand-az",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> std::cmp::Ordering {
        match self {
            Self::Newest => b.id.cmp(&a.id),
            Self::PriceAscending => a.price.cmp(&b.price),
            Self::PriceDescending => b.price.cmp(&a.price),
            Self::BrandAlphabetical => a.brand.cmp(&b.brand),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "newest" => Ok(Self::Newest),
            "price-low" | "price-ascending" => Ok(Self::PriceAscending),
            "price-high" | "price-descending" => Ok(Self::PriceDescending),
            "brand-az" | "brand-alphabetical" => Ok(Self::BrandAlphabetical),
            other => Err(FilterError::UnknownSortKey(other.to_string())),
        }
    }
}

/// Inclusive price bounds. A missing maximum means no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Option<Decimal>,
}

impl PriceRange {
    /// Create a validated range.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound is negative or `min > max`.
    pub fn new(min: Decimal, max: Option<Decimal>) -> Result<Self, FilterError> {
        if min.is_sign_negative() && !min.is_zero() {
            return Err(FilterError::NegativePrice);
        }
        if let Some(max) = max {
            if max.is_sign_negative() && !max.is_zero() {
                return Err(FilterError::NegativePrice);
            }
            if min > max {
                return Err(FilterError::InvertedPriceRange { min, max });
            }
        }
        Ok(Self { min, max })
    }

    /// Whether `price` lies within the bounds (inclusive).
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }
}

/// The shopper's browsing facets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub search_text: String,
    pub categories: BTreeSet<String>,
    pub brands: BTreeSet<String>,
    pub sizes: BTreeSet<String>,
    pub colors: BTreeSet<String>,
    pub price_range: PriceRange,
    pub sort_key: SortKey,
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

impl FilterState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Select the category, or deselect it if already selected.
    pub fn toggle_category(&mut self, category: &str) {
        toggle(&mut self.categories, category);
    }

    pub fn toggle_brand(&mut self, brand: &str) {
        toggle(&mut self.brands, brand);
    }

    pub fn toggle_size(&mut self, size: &str) {
        toggle(&mut self.sizes, size);
    }

    pub fn toggle_color(&mut self, color: &str) {
        toggle(&mut self.colors, color);
    }

    /// Set inclusive price bounds; `None` as maximum removes the upper bound.
    ///
    /// # Errors
    ///
    /// Returns an error (and keeps the previous range) if the bounds are
    /// negative or inverted.
    pub fn set_price_range(
        &mut self,
        min: Decimal,
        max: impl Into<Option<Decimal>>,
    ) -> Result<(), FilterError> {
        self.price_range = PriceRange::new(min, max.into())?;
        Ok(())
    }

    pub const fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
    }

    /// Reset every facet to its default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether every facet is at its default.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a single product passes the search, category, brand and price
    /// facets.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if !self.search_text.is_empty() {
            let needle = self.search_text.to_lowercase();
            if !product.name.to_lowercase().contains(&needle)
                && !product.brand.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if !self.categories.is_empty() && !self.categories.contains(&product.category) {
            return false;
        }

        if !self.brands.is_empty() && !self.brands.contains(&product.brand) {
            return false;
        }

        self.price_range.contains(product.price)
    }

    /// Filter and sort `products` according to the current state.
    ///
    /// The sort is stable: products that compare equal keep their input order.
    #[must_use]
    pub fn derived_list(&self, products: &[Product]) -> Vec<Product> {
        let mut list: Vec<Product> = products
            .iter()
            .filter(|product| self.matches(product))
            .cloned()
            .collect();
        let key = self.sort_key;
        list.sort_by(|a, b| key.compare(a, b));
        list
    }
}

/// Filter facets as flat query parameters (`?q=tee&category=shirts,hats&sort=price-low`).
///
/// List-valued facets are comma separated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Repeated values select once.
fn collect_set(raw: Option<&str>) -> BTreeSet<String> {
    split_list(raw).map(str::to_string).collect()
}

fn parse_price(raw: Option<&str>) -> Result<Option<Decimal>, FilterError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s
            .parse::<Decimal>()
            .map(Some)
            .map_err(|_| FilterError::InvalidPrice(s.to_string())),
        None => Ok(None),
    }
}

impl FilterQuery {
    /// Whether no parameter was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Build a filter state from the parameters.
    ///
    /// # Errors
    ///
    /// Returns an error for unparseable prices, invalid ranges or unknown
    /// sort keys.
    pub fn to_state(&self) -> Result<FilterState, FilterError> {
        let mut state = FilterState::new();
        if let Some(q) = &self.q {
            state.set_search_text(q.as_str());
        }
        state.categories = collect_set(self.category.as_deref());
        state.brands = collect_set(self.brand.as_deref());
        state.sizes = collect_set(self.size.as_deref());
        state.colors = collect_set(self.color.as_deref());

        let min = parse_price(self.min_price.as_deref())?.unwrap_or(Decimal::ZERO);
        let max = parse_price(self.max_price.as_deref())?;
        state.set_price_range(min, max)?;

        if let Some(sort) = self.sort.as_deref().filter(|s| !s.trim().is_empty()) {
            state.set_sort_key(sort.parse()?);
        }
        Ok(state)
    }
}
