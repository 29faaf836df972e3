//! Domain models for admin.

pub mod product;
pub mod session;

pub use product::{NewProduct, ProductDraft, split_options};
pub use session::keys as session_keys;
