//! Core types for LUXE.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod list;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use list::ListResponse;
pub use price::{CurrencyCode, ExchangeRate, Price};
pub use status::*;
