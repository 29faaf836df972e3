//! LUXE Core - Shared types and client-side stores.
//!
//! This crate provides the types and derived-state logic used across all LUXE
//! components:
//! - `storefront` - Public-facing shop (catalog, cart, checkout)
//! - `admin` - Store administration (products, orders, customers, settings)
//! - `cli` - Command-line tools for settings and catalog browsing
//!
//! # Architecture
//!
//! The core crate contains only types and pure state machines - no I/O, no
//! HTTP clients. The cart and filter stores are plain values: the caller owns
//! them (the storefront keeps one of each per visitor session) and every
//! derived value is recomputed from the current state.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and statuses
//! - [`product`] - Catalog product as served by the backend
//! - [`cart`] - Shopping cart store keyed by (product, size, color)
//! - [`filter`] - Product filter/sort store
//! - [`checkout`] - Order summary pricing and checkout form validation
//! - [`order`], [`customer`] - Backend order and customer records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod customer;
pub mod filter;
pub mod order;
pub mod product;
pub mod types;

pub use cart::{AddOutcome, Cart, CartError, CartLine, LineKey};
pub use checkout::{
    CheckoutForm, CheckoutSettings, CheckoutSettingsPayload, OrderSummary, ShippingDetails,
    ShippingMethod, ValidationError,
};
pub use customer::Customer;
pub use filter::{FilterError, FilterQuery, FilterState, PriceRange, SortKey};
pub use order::{NewOrder, NewOrderItem, Order, OrderAck, OrderItem};
pub use product::{Product, ProductImage};
pub use types::*;
