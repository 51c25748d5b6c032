use crate::catalog::CatalogError;
use thiserror::Error;

/// Cart engine errors
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Guests cannot modify the cart")]
    PermissionDenied,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Quantity out of range")]
    InvalidQuantity,

    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<CatalogError> for CartError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ItemNotFound(id) | CatalogError::ProductNotFound(id) => {
                CartError::NotFound(id)
            }
            CatalogError::Storage(e) => CartError::Storage(e.to_string()),
        }
    }
}

pub type CartResult<T> = Result<T, CartError>;
