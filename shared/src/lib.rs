//! Shared types for the Sabores Express platform
//!
//! Domain types used across crates: catalog models, session cart
//! structures, and order/receipt types exchanged over the API.

pub mod cart;
pub mod models;
pub mod order;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use cart::{CartLine, CartSummaryEntry, MarketCart, MarketCartLine, MultiCart};
pub use order::{
    DeliveryDetails, MarketDeliveryDetails, MarketOrder, MarketOrderLine, Order, OrderLine,
    OrderStatus, PaymentMethod, PaymentSelection,
};
