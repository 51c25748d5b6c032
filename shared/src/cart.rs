//! Session cart structures
//!
//! One shopping cart per restaurant per session ([`MultiCart`]), plus a
//! single flat cart for the agricultural market ([`MarketCart`]).
//!
//! # Invariants
//!
//! - At most one [`CartLine`] per (restaurant, item) pair; duplicate adds
//!   merge by incrementing the quantity (saturating at `u32::MAX`; the
//!   engine rejects requests long before that bound).
//! - A restaurant entry with no lines never persists: it is pruned the
//!   moment its last line is removed, so readers never observe an empty
//!   partition.
//! - [`MarketCartLine::subtotal`] always equals `unit_price × quantity`;
//!   it is recomputed on every mutation.
//!
//! Both carts serialize transparently (a plain map / a plain list), so
//! the session-persisted shape stays stable across requests.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One (item, quantity, price-snapshot) entry within a restaurant cart
///
/// `unit_price` is captured from the catalog at add time and is not
/// re-read at checkout, so mid-session price changes do not retroactively
/// alter an in-progress cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub restaurant_id: String,
}

/// Per-restaurant item count, for the cart badge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSummaryEntry {
    pub restaurant_id: String,
    pub total_items: u32,
}

/// Mapping from restaurant id to that restaurant's ordered cart lines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MultiCart {
    carts: HashMap<String, Vec<CartLine>>,
}

impl MultiCart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines for one restaurant, if that restaurant has a cart
    pub fn lines(&self, restaurant_id: &str) -> Option<&[CartLine]> {
        self.carts.get(restaurant_id).map(|v| v.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.carts.is_empty()
    }

    /// Quantity currently carried for one (restaurant, item); 0 if absent
    pub fn quantity_of(&self, restaurant_id: &str, item_id: &str) -> u32 {
        self.carts
            .get(restaurant_id)
            .and_then(|lines| lines.iter().find(|l| l.item_id == item_id))
            .map(|l| l.quantity)
            .unwrap_or(0)
    }

    /// Merge a line into the cart
    ///
    /// If a line for the same (restaurant, item) exists its quantity is
    /// incremented (saturating at `u32::MAX`) and the original price
    /// snapshot is kept; otherwise the line is appended.
    pub fn add(&mut self, line: CartLine) {
        let entry = self.carts.entry(line.restaurant_id.clone()).or_default();
        if let Some(existing) = entry.iter_mut().find(|l| l.item_id == line.item_id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            entry.push(line);
        }
    }

    /// Remove one line; returns whether the line was present
    ///
    /// Prunes the restaurant entry if it becomes empty.
    pub fn remove(&mut self, restaurant_id: &str, item_id: &str) -> bool {
        let Some(lines) = self.carts.get_mut(restaurant_id) else {
            return false;
        };
        let before = lines.len();
        lines.retain(|l| l.item_id != item_id);
        let removed = lines.len() != before;
        if lines.is_empty() {
            self.carts.remove(restaurant_id);
        }
        removed
    }

    /// Overwrite a line's quantity in place; `quantity == 0` removes it
    ///
    /// Returns whether a matching line existed.
    pub fn set_quantity(&mut self, restaurant_id: &str, item_id: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(restaurant_id, item_id);
        }
        let Some(lines) = self.carts.get_mut(restaurant_id) else {
            return false;
        };
        match lines.iter_mut().find(|l| l.item_id == item_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Σ(unit_price × quantity) over one restaurant's lines
    ///
    /// Pure; an absent cart totals zero.
    pub fn total(&self, restaurant_id: &str) -> Decimal {
        self.carts
            .get(restaurant_id)
            .map(|lines| {
                lines
                    .iter()
                    .map(|l| l.unit_price * Decimal::from(l.quantity))
                    .sum()
            })
            .unwrap_or_default()
    }

    /// Remove and return one restaurant's lines (checkout clear)
    pub fn take_restaurant(&mut self, restaurant_id: &str) -> Option<Vec<CartLine>> {
        self.carts.remove(restaurant_id)
    }

    /// Item counts per restaurant with a non-empty cart
    pub fn summary(&self) -> Vec<CartSummaryEntry> {
        let mut entries: Vec<CartSummaryEntry> = self
            .carts
            .iter()
            .map(|(restaurant_id, lines)| CartSummaryEntry {
                restaurant_id: restaurant_id.clone(),
                total_items: lines.iter().map(|l| l.quantity).sum(),
            })
            .collect();
        entries.sort_by(|a, b| a.restaurant_id.cmp(&b.restaurant_id));
        entries
    }
}

/// One entry in the agricultural market cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCartLine {
    pub product_id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    /// Always `unit_price × quantity`; recomputed on every mutation
    pub subtotal: Decimal,
}

/// The single market cart (no per-seller partition)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketCart {
    lines: Vec<MarketCartLine>,
}

impl MarketCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[MarketCartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quantity already in the cart for one product
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map(|l| l.quantity)
            .unwrap_or(0)
    }

    /// Merge a quantity of one product into the cart
    ///
    /// The caller has already checked stock; this only maintains the
    /// merge-by-product and subtotal invariants.
    pub fn add(&mut self, product_id: &str, name: &str, unit_price: Decimal, quantity: u32) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = line.quantity.saturating_add(quantity);
            line.subtotal = line.unit_price * Decimal::from(line.quantity);
        } else {
            self.lines.push(MarketCartLine {
                product_id: product_id.to_string(),
                name: name.to_string(),
                unit_price,
                quantity,
                subtotal: unit_price * Decimal::from(quantity),
            });
        }
    }

    /// Remove one product's line; returns whether it was present
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    /// Σ subtotal over all lines
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(|l| l.subtotal).sum()
    }

    /// Remove and return every line (market checkout clear)
    pub fn take_all(&mut self) -> Vec<MarketCartLine> {
        std::mem::take(&mut self.lines)
    }
}
