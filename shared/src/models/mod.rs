//! Catalog data models
//!
//! Shared between sabores-server and frontend (via API).
//! Money fields are `rust_decimal::Decimal`, serialized as strings.

pub mod menu_item;
pub mod product;
pub mod restaurant;

// Re-exports
pub use menu_item::*;
pub use product::*;
pub use restaurant::*;
