use crate::storage::StoreError;
use thiserror::Error;

/// Checkout failures
///
/// Every variant is terminal for the attempt and recoverable by the
/// caller; nothing here is fatal to the process. Storage failures have
/// already been rolled back when they surface.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Guests cannot confirm orders")]
    PermissionDenied,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("No payment method selected")]
    PaymentMissing,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Stock conflict for {product_id}: requested {requested}, available {available}")]
    StockConflict {
        product_id: String,
        requested: u32,
        available: u32,
    },

    #[error("Order commit failed: {0}")]
    CommitFailed(String),
}

impl From<StoreError> for CheckoutError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::StockConflict {
                product_id,
                requested,
                available,
            } => CheckoutError::StockConflict {
                product_id,
                requested,
                available,
            },
            StoreError::ProductNotFound(id) => CheckoutError::NotFound(id),
            // DuplicateOrderCode is retried by the orchestrator; if it
            // still escapes, the commit genuinely failed.
            other => CheckoutError::CommitFailed(other.to_string()),
        }
    }
}

pub type CheckoutResult<T> = Result<T, CheckoutError>;
