//! Restaurant order pricing
//!
//! Tax is computed once, on the subtotal, rounded half-up to two
//! decimal places. The total is the exact sum `subtotal + tax` with no
//! further rounding, so receipt arithmetic always reconciles.

use rust_decimal::{Decimal, RoundingStrategy};
use shared::cart::CartLine;
use shared::order::ReceiptLine;

/// IVA applied to restaurant orders (16%)
pub const TAX_RATE: Decimal = Decimal::from_parts(16, 0, 0, false, 2);

/// A cart priced for checkout
#[derive(Debug, Clone)]
pub struct PricedCart {
    pub lines: Vec<ReceiptLine>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Half-up tax on a subtotal, rounded to cents
pub fn tax_for(subtotal: Decimal) -> Decimal {
    (subtotal * TAX_RATE).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Price a restaurant cart from its snapshotted unit prices
pub fn price_cart(lines: &[CartLine]) -> PricedCart {
    let receipt_lines: Vec<ReceiptLine> = lines
        .iter()
        .map(|line| ReceiptLine {
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            subtotal: line.unit_price * Decimal::from(line.quantity),
        })
        .collect();

    let subtotal: Decimal = receipt_lines.iter().map(|l| l.subtotal).sum();
    let tax = tax_for(subtotal);
    let total = subtotal + tax;

    PricedCart {
        lines: receipt_lines,
        subtotal,
        tax,
        total,
    }
}
