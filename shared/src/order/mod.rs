//! Order entities, checkout payloads and receipt view-models

pub mod types;

pub use types::*;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Entities
// ============================================================================

/// A committed restaurant order
///
/// `code` is the short public identifier shown to the customer; `id` is
/// the internal numeric key. Both are immutable after commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub code: String,
    pub user_id: String,
    pub restaurant_id: String,
    pub client_name: String,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub payment: PaymentSelection,
    pub delivery: DeliveryDetails,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// One line of a committed order
///
/// Owned exclusively by its [`Order`]; deleting the order deletes its
/// lines in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: u64,
    pub item_id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// A committed agricultural market order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketOrder {
    pub id: u64,
    pub code: String,
    pub user_id: String,
    pub total: Decimal,
    pub payment: PaymentSelection,
    pub delivery: MarketDeliveryDetails,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// One line of a committed market order, referencing the product whose
/// stock it decremented
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketOrderLine {
    pub order_id: u64,
    pub product_id: String,
    pub quantity: u32,
    /// Sale price captured at commit time
    pub unit_price: Decimal,
}

// ============================================================================
// Checkout payloads
// ============================================================================

/// Restaurant checkout form
///
/// Delivery fields are flat and optional on the wire; the checkout
/// validates them into [`DeliveryDetails`] and names the missing field
/// on failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// `domicilio` or `reserva`
    pub delivery_type: String,
    pub client_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Reservation date, `YYYY-MM-DD`
    pub date: Option<String>,
    /// Reservation time, `HH:MM`
    pub time: Option<String>,
}

/// Market checkout form (`domicilio` or `recogida`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketCheckoutRequest {
    pub delivery_type: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Pickup time, `HH:MM`
    pub pickup_time: Option<String>,
}

/// Payment selection form
///
/// Which detail fields are required depends on the method; the server
/// validates before recording the selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub method: String,
    pub card_number: Option<String>,
    pub expiry: Option<String>,
    pub cvv: Option<String>,
    pub mobile_number: Option<String>,
    pub account_number: Option<String>,
    pub holder_name: Option<String>,
}

// ============================================================================
// Receipts
// ============================================================================

/// One priced line on a receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Receipt returned by a successful restaurant checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub code: String,
    pub restaurant_id: String,
    pub client_name: String,
    pub lines: Vec<ReceiptLine>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub payment: PaymentSelection,
    pub delivery: DeliveryDetails,
    pub created_at: DateTime<Utc>,
}

/// Receipt returned by a successful market checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketReceipt {
    pub code: String,
    pub lines: Vec<ReceiptLine>,
    pub total: Decimal,
    pub payment: PaymentSelection,
    pub delivery: MarketDeliveryDetails,
    pub created_at: DateTime<Utc>,
}
