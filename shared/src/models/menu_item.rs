//! Menu Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A dish on a restaurant's menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    /// Restaurant reference (String ID)
    pub restaurant_id: String,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
}
