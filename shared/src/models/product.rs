//! Agricultural Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fresh-produce item sold on the agricultural market
///
/// `stock` is unsigned: the commit protocol rejects any decrement that
/// would drive it below zero, so a negative value is unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    pub stock: u32,
}
