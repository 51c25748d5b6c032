//! Checkout orchestration
//!
//! Turns a session cart into a committed order. Both flows follow the
//! same shape: precondition checks against the session (identity, cart
//! presence, payment selection), wire-level validation of the delivery
//! request, pricing, then a bounded retry loop around the store's
//! transactional commit. The session cart is cleared only after the
//! commit succeeded; any failure leaves cart, payment selection and
//! stock exactly as they were.

mod code;
mod error;
mod market;
mod payment;
mod pricing;
mod restaurant;

pub use code::{MAX_CODE_ATTEMPTS, ORDER_CODE_LEN, generate_order_code};
pub use error::{CheckoutError, CheckoutResult};
pub use payment::select_payment;
pub use pricing::{PricedCart, TAX_RATE, price_cart, tax_for};

use crate::catalog::CatalogService;
use crate::storage::Store;

/// Order finalization orchestrator
#[derive(Clone)]
pub struct CheckoutService {
    store: Store,
    catalog: CatalogService,
}

impl CheckoutService {
    pub fn new(store: Store, catalog: CatalogService) -> Self {
        Self { store, catalog }
    }
}

/// Trimmed, non-empty text field or a validation error naming the field
fn require<'a>(value: &'a Option<String>, field: &str) -> CheckoutResult<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CheckoutError::Validation(format!("{field} is required"))),
    }
}
