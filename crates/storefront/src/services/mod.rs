//! Business services for the storefront.

pub mod catalog;
pub mod checkout;

pub use catalog::{Catalog, CatalogSource};
pub use checkout::{CheckoutError, PaymentRequest};
